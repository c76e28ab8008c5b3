//! Payment store — mobile-money subscription payments.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use sauti_api_client::RemoteApi;
use sauti_core::models::{
    NewPayment, Payment, PaymentStatus, Provider, SubscriptionStatus, SubscriptionType,
};

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};
use crate::session::SessionStore;
use crate::sync::FetchSeq;

struct PaymentState {
    payments: Vec<Payment>,
    loading: bool,
}

/// Store of the signed-in user's payments.
///
/// A successful `initiate_payment` is the sole trigger that flips the
/// session user's subscription from inactive to active.
pub struct PaymentStore {
    api: Arc<dyn RemoteApi>,
    session: Arc<SessionStore>,
    state: Mutex<PaymentState>,
    fetch_seq: FetchSeq,
    listeners: Listeners,
}

impl PaymentStore {
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(PaymentState {
                payments: Vec::new(),
                loading: false,
            }),
            fetch_seq: FetchSeq::new(),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PaymentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
        self.listeners.notify();
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.lock().payments.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn subscribe<F: Fn() + Send + Sync + 'static>(&self, listener: F) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Replace the collection with the current user's payments.
    ///
    /// The backend returns all payments; ownership filtering happens here.
    pub async fn fetch_payments(&self) -> Result<(), StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let seq = self.fetch_seq.begin();
        self.set_loading(true);

        match self.api.get_all_payments().await {
            Ok(payments) => {
                if self.fetch_seq.is_current(seq) {
                    let mine: Vec<Payment> = payments
                        .into_iter()
                        .filter(|p| p.user_id == user_id)
                        .collect();
                    let mut state = self.lock();
                    state.payments = mine;
                    state.loading = false;
                    drop(state);
                    self.listeners.notify();
                } else {
                    debug!(seq, "stale payment fetch discarded");
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch payments");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Replace the collection with the server-side per-user history.
    pub async fn fetch_payment_history(&self) -> Result<(), StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let seq = self.fetch_seq.begin();
        self.set_loading(true);

        match self.api.get_payment_history(&user_id).await {
            Ok(payments) => {
                if self.fetch_seq.is_current(seq) {
                    let mut state = self.lock();
                    state.payments = payments;
                    state.loading = false;
                    drop(state);
                    self.listeners.notify();
                } else {
                    debug!(seq, "stale payment history fetch discarded");
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch payment history");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Transition a payment's status server-side and reconcile the
    /// returned record. An unknown payment id is a logged no-op.
    pub async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        self.set_loading(true);

        match self.api.update_payment_status(payment_id, status).await {
            Ok(updated) => {
                let mut state = self.lock();
                match state.payments.iter_mut().find(|p| p.id == payment_id) {
                    Some(payment) => *payment = updated,
                    None => warn!(payment_id, "payment not found; status not reconciled"),
                }
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to update payment status");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Start a mobile-money payment for a subscription.
    ///
    /// On success the session's subscription status transitions to active
    /// and the server's payment record is prepended to the collection.
    pub async fn initiate_payment(
        &self,
        amount: i64,
        phone_number: &str,
        provider: Provider,
        subscription_type: SubscriptionType,
    ) -> Result<Payment, StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        if amount <= 0 || phone_number.trim().is_empty() {
            return Err(StoreError::Validation("Please fill all fields".into()));
        }

        self.set_loading(true);
        let request = NewPayment {
            amount,
            phone_number: phone_number.into(),
            provider,
            subscription_type,
            user_id,
        };

        match self.api.initiate_payment(&request).await {
            Ok(payment) => {
                // Payment success is the activation trigger. A failure here
                // does not undo the payment itself.
                if let Err(e) = self
                    .session
                    .update_subscription_status(SubscriptionStatus::Active)
                    .await
                {
                    warn!(error = %e, "payment succeeded but activation failed");
                }

                let mut state = self.lock();
                state.payments.insert(0, payment.clone());
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(payment)
            }
            Err(e) => {
                error!(error = %e, "failed to initiate payment");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }
}
