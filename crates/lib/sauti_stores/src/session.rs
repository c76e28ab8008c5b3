//! Session store — authenticated user, bearer token, hydration.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use sauti_api_client::RemoteApi;
use sauti_core::models::{SubscriptionStatus, User, UserUpdate};
use sauti_core::storage::{KEY_TOKEN, KEY_USER, KeyValueStorage, StorageError};

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};

struct SessionState {
    user: Option<User>,
    token: Option<String>,
    loading: bool,
}

/// Owner of the authenticated session.
///
/// The token is non-`None` exactly when the user is (given a successful
/// hydration); both are set together, cleared together, and persisted
/// together. Other stores read the user by snapshot and never mutate it.
pub struct SessionStore {
    api: Arc<dyn RemoteApi>,
    storage: Arc<dyn KeyValueStorage>,
    state: Mutex<SessionState>,
    listeners: Listeners,
}

impl SessionStore {
    /// New store with an empty session. `loading` stays `true` until
    /// [`SessionStore::hydrate`] settles.
    pub fn new(api: Arc<dyn RemoteApi>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            api,
            storage,
            state: Mutex::new(SessionState {
                user: None,
                token: None,
                loading: true,
            }),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
        self.listeners.notify();
    }

    /// Current user snapshot.
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// Current user id, when signed in.
    pub fn user_id(&self) -> Option<String> {
        self.lock().user.as_ref().map(|u| u.id.clone())
    }

    /// Current bearer token snapshot.
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
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

    /// Restore the persisted session, if any.
    ///
    /// Adapter failures and corrupt records leave the session empty and are
    /// reported as warnings — the app continues signed out. `loading`
    /// clears regardless of outcome.
    pub async fn hydrate(&self) {
        let loaded: Result<(Option<String>, Option<String>), StorageError> = async {
            Ok((
                self.storage.get(KEY_TOKEN).await?,
                self.storage.get(KEY_USER).await?,
            ))
        }
        .await;

        match loaded {
            Ok((Some(token), Some(user_json))) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    let mut state = self.lock();
                    state.token = Some(token);
                    state.user = Some(user);
                    drop(state);
                    self.listeners.notify();
                }
                Err(e) => warn!(error = %e, "persisted user record is corrupt; starting signed out"),
            },
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to load persisted session"),
        }

        self.set_loading(false);
    }

    /// Authenticate with email + password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), StoreError> {
        self.set_loading(true);
        let result = self.adopt_auth_payload(self.api.sign_in(email, password).await).await;
        self.set_loading(false);
        result
    }

    /// Create an account and sign in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<(), StoreError> {
        self.set_loading(true);
        let result = self
            .adopt_auth_payload(
                self.api
                    .sign_up(email, password, first_name, last_name, phone)
                    .await,
            )
            .await;
        self.set_loading(false);
        result
    }

    /// Adopt a sign-in/sign-up payload: on success with a token, set the
    /// session in memory and persist it; otherwise leave prior state
    /// untouched.
    async fn adopt_auth_payload(
        &self,
        payload: Result<sauti_api_client::AuthPayload, sauti_api_client::ApiError>,
    ) -> Result<(), StoreError> {
        let payload = payload.map_err(|e| {
            error!(error = %e, "authentication failed");
            e
        })?;

        let (Some(token), Some(user)) = (payload.token, payload.user) else {
            warn!("auth response carried no token; session unchanged");
            return Ok(());
        };

        {
            let mut state = self.lock();
            state.token = Some(token.clone());
            state.user = Some(user.clone());
        }
        self.listeners.notify();

        self.persist_session(&token, &user).await?;
        info!(user_id = %user.id, "signed in");
        Ok(())
    }

    async fn persist_session(&self, token: &str, user: &User) -> Result<(), StoreError> {
        self.storage.set(KEY_TOKEN, token).await?;
        let user_json = serde_json::to_string(user)?;
        self.storage.set(KEY_USER, &user_json).await?;
        Ok(())
    }

    /// Sign out remotely, then clear the session.
    ///
    /// The local clear proceeds even when the remote call fails; the
    /// failure is reported to the caller after cleanup.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.set_loading(true);

        let remote = self.api.sign_out().await;
        if let Err(e) = &remote {
            warn!(error = %e, "remote sign-out failed; clearing local session anyway");
        }

        {
            let mut state = self.lock();
            state.user = None;
            state.token = None;
        }
        self.listeners.notify();

        let removal: Result<(), StorageError> = async {
            self.storage.remove(KEY_TOKEN).await?;
            self.storage.remove(KEY_USER).await?;
            Ok(())
        }
        .await;
        if let Err(e) = &removal {
            warn!(error = %e, "failed to remove persisted session");
        }

        self.set_loading(false);

        remote?;
        removal?;
        Ok(())
    }

    /// Merge a partial edit into the current user and persist the merged
    /// record. No-op when signed out. Persistence is fire-and-forget.
    pub fn update_user(&self, updates: &UserUpdate) {
        let updated = {
            let mut state = self.lock();
            let Some(user) = state.user.as_mut() else {
                return;
            };
            user.apply(updates);
            user.clone()
        };
        self.listeners.notify();

        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            match serde_json::to_string(&updated) {
                Ok(json) => {
                    if let Err(e) = storage.set(KEY_USER, &json).await {
                        warn!(error = %e, "failed to persist user update");
                    }
                }
                Err(e) => warn!(error = %e, "failed to serialize user update"),
            }
        });
    }

    /// Transition the subscription status server-side, then adopt the
    /// status the server echoes. No-op when signed out.
    pub async fn update_subscription_status(
        &self,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError> {
        let Some(user) = self.user() else {
            return Ok(());
        };

        let payload = self
            .api
            .update_subscription_status(&user.id, Some(status))
            .await
            .map_err(|e| {
                error!(error = %e, "failed to update subscription status");
                e
            })?;

        self.adopt_subscription_status(payload.subscription_status)
            .await
    }

    /// Fetch the server-side subscription status and reconcile it into the
    /// current user. No-op when signed out.
    pub async fn check_subscription_status(&self) -> Result<(), StoreError> {
        let Some(user) = self.user() else {
            return Ok(());
        };

        let payload = self
            .api
            .check_subscription_status(&user.id)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to check subscription status");
                e
            })?;

        self.adopt_subscription_status(payload.subscription_status)
            .await
    }

    async fn adopt_subscription_status(
        &self,
        status: SubscriptionStatus,
    ) -> Result<(), StoreError> {
        let updated = {
            let mut state = self.lock();
            let Some(user) = state.user.as_mut() else {
                return Ok(());
            };
            user.subscription_status = status;
            user.clone()
        };
        self.listeners.notify();

        let user_json = serde_json::to_string(&updated)?;
        self.storage.set(KEY_USER, &user_json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testutil::{FailingStorage, MockApi, sample_user};
    use sauti_core::storage::MemoryStorage;

    fn store_with(api: Arc<MockApi>) -> (Arc<SessionStore>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(SessionStore::new(api, storage.clone()));
        (store, storage)
    }

    #[tokio::test]
    async fn loading_starts_true_and_clears_after_hydration() {
        let (store, _storage) = store_with(Arc::new(MockApi::new()));
        assert!(store.loading());
        store.hydrate().await;
        assert!(!store.loading());
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn hydrate_restores_persisted_session() {
        let (store, storage) = store_with(Arc::new(MockApi::new()));
        let user = sample_user("u1");
        storage.set(KEY_TOKEN, "tok-1").await.unwrap();
        storage
            .set(KEY_USER, &serde_json::to_string(&user).unwrap())
            .await
            .unwrap();

        store.hydrate().await;

        assert_eq!(store.token().as_deref(), Some("tok-1"));
        assert_eq!(store.user().unwrap().id, "u1");
    }

    #[tokio::test]
    async fn hydrate_with_adapter_failure_leaves_session_empty() {
        let store = SessionStore::new(
            Arc::new(MockApi::new()),
            Arc::new(FailingStorage::default()),
        );
        store.hydrate().await;
        assert!(store.user().is_none());
        assert!(store.token().is_none());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn sign_in_sets_session_and_persists_both_keys() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        let (store, storage) = store_with(api);
        store.hydrate().await;

        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        assert!(!store.loading());
        assert_eq!(store.token().as_deref(), Some("tok-1"));
        assert_eq!(store.user().unwrap().id, "u1");
        assert_eq!(storage.get(KEY_TOKEN).await.unwrap().as_deref(), Some("tok-1"));
        assert!(storage.get(KEY_USER).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sign_in_failure_leaves_prior_state_untouched() {
        let api = Arc::new(MockApi::new());
        api.fail_with("Invalid credentials");
        let (store, storage) = store_with(api);
        store.hydrate().await;

        let err = store.sign_in("amara@example.com", "wrong").await;

        assert!(matches!(err, Err(StoreError::Api(_))));
        assert!(!store.loading());
        assert!(store.user().is_none());
        assert!(storage.get(KEY_TOKEN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_up_adopts_token_and_user() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-9", sample_user("u9"));
        let (store, _storage) = store_with(api);
        store.hydrate().await;

        store
            .sign_up("amara@example.com", "hunter2", "Amara", "Okello", "256700000000")
            .await
            .unwrap();

        assert_eq!(store.user().unwrap().id, "u9");
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        let (store, storage) = store_with(api);
        store.hydrate().await;
        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        store.logout().await.unwrap();

        assert!(store.user().is_none());
        assert!(store.token().is_none());
        assert!(!store.loading());
        assert!(storage.get(KEY_TOKEN).await.unwrap().is_none());
        assert!(storage.get(KEY_USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_remote_fails() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        let (store, storage) = store_with(api.clone());
        store.hydrate().await;
        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        api.fail_with("backend down");
        let result = store.logout().await;

        assert!(result.is_err());
        assert!(store.user().is_none());
        assert!(!store.loading());
        assert!(storage.get(KEY_TOKEN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_user_without_session_is_a_noop() {
        let (store, storage) = store_with(Arc::new(MockApi::new()));
        store.hydrate().await;

        store.update_user(&UserUpdate {
            first_name: Some("Ama".into()),
            ..Default::default()
        });

        assert!(store.user().is_none());
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(storage.get(KEY_USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_user_merges_and_persists() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        let (store, storage) = store_with(api);
        store.hydrate().await;
        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        store.update_user(&UserUpdate {
            first_name: Some("Ama".into()),
            ..Default::default()
        });

        assert_eq!(store.user().unwrap().first_name, "Ama");
        let mut persisted = None;
        for _ in 0..20 {
            tokio::task::yield_now().await;
            persisted = storage.get(KEY_USER).await.unwrap();
            if persisted.as_deref().is_some_and(|p| p.contains("Ama")) {
                break;
            }
        }
        assert!(persisted.unwrap().contains("\"firstName\":\"Ama\""));
    }

    #[tokio::test]
    async fn update_subscription_status_adopts_server_value() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        api.set_subscription_status(SubscriptionStatus::Active);
        let (store, storage) = store_with(api);
        store.hydrate().await;
        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        store
            .update_subscription_status(SubscriptionStatus::Active)
            .await
            .unwrap();

        assert_eq!(
            store.user().unwrap().subscription_status,
            SubscriptionStatus::Active
        );
        assert!(
            storage
                .get(KEY_USER)
                .await
                .unwrap()
                .unwrap()
                .contains("ACTIVE")
        );
    }

    #[tokio::test]
    async fn update_subscription_status_failure_leaves_status_unchanged() {
        let api = Arc::new(MockApi::new());
        api.set_auth_payload("tok-1", sample_user("u1"));
        let (store, _storage) = store_with(api.clone());
        store.hydrate().await;
        store.sign_in("amara@example.com", "hunter2").await.unwrap();

        api.fail_with("backend down");
        let result = store
            .update_subscription_status(SubscriptionStatus::Active)
            .await;

        assert!(result.is_err());
        assert_eq!(
            store.user().unwrap().subscription_status,
            SubscriptionStatus::Inactive
        );
    }
}
