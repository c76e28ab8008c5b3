//! The store registry — composition root for the whole layer.

use std::sync::Arc;

use sauti_api_client::RemoteApi;
use sauti_core::notify::NotificationScheduler;
use sauti_core::storage::KeyValueStorage;

use crate::notification::NotificationStore;
use crate::payment::PaymentStore;
use crate::question::QuestionStore;
use crate::session::SessionStore;
use crate::survey::SurveyStore;
use crate::survey_form::SurveyFormStore;
use crate::video::VideoStore;

/// Every store, wired once at process start.
///
/// The host holds this registry and reaches stores only through it — there
/// are no ambient singletons. The payment store carries the session store
/// handle for the subscription-activation side effect.
pub struct Stores {
    pub session: Arc<SessionStore>,
    pub questions: Arc<QuestionStore>,
    pub surveys: Arc<SurveyStore>,
    pub survey_form: Arc<SurveyFormStore>,
    pub videos: Arc<VideoStore>,
    pub payments: Arc<PaymentStore>,
    pub notifications: Arc<NotificationStore>,
}

impl Stores {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        storage: Arc<dyn KeyValueStorage>,
        scheduler: Arc<dyn NotificationScheduler>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(api.clone(), storage));
        Self {
            questions: Arc::new(QuestionStore::new(api.clone(), session.clone())),
            surveys: Arc::new(SurveyStore::new(api.clone(), session.clone())),
            survey_form: Arc::new(SurveyFormStore::new(api.clone(), session.clone())),
            videos: Arc::new(VideoStore::new(api.clone(), session.clone())),
            payments: Arc::new(PaymentStore::new(api, session.clone())),
            notifications: Arc::new(NotificationStore::new(scheduler)),
            session,
        }
    }

    /// Run the startup work: session hydration and the one-time
    /// notification permission request.
    pub async fn bootstrap(&self) {
        self.session.hydrate().await;
        self.notifications.init().await;
    }
}
