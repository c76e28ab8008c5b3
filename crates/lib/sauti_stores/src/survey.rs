//! Survey store — the current user's published surveys.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use sauti_api_client::RemoteApi;
use sauti_core::models::{FileRef, NewSurvey, Survey, SurveyUpdate};

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};
use crate::session::SessionStore;
use crate::sync::FetchSeq;

struct SurveyState {
    surveys: Vec<Survey>,
    loading: bool,
    /// At most one file pending upload, distinct from the collection.
    selected_file: Option<FileRef>,
}

/// Store of surveys owned by the signed-in user.
pub struct SurveyStore {
    api: Arc<dyn RemoteApi>,
    session: Arc<SessionStore>,
    state: Mutex<SurveyState>,
    fetch_seq: FetchSeq,
    listeners: Listeners,
}

impl SurveyStore {
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(SurveyState {
                surveys: Vec::new(),
                loading: false,
                selected_file: None,
            }),
            fetch_seq: FetchSeq::new(),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SurveyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
        self.listeners.notify();
    }

    pub fn surveys(&self) -> Vec<Survey> {
        self.lock().surveys.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn selected_file(&self) -> Option<FileRef> {
        self.lock().selected_file.clone()
    }

    /// Stage (or clear) the file for the next `create_survey`.
    pub fn set_selected_file(&self, file: Option<FileRef>) {
        self.lock().selected_file = file;
        self.listeners.notify();
    }

    pub fn subscribe<F: Fn() + Send + Sync + 'static>(&self, listener: F) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Create a survey from the given fields plus the staged file.
    ///
    /// Fails fast unless title, description, payment option, and a
    /// selected file are all present.
    pub async fn create_survey(
        &self,
        title: &str,
        description: &str,
        payment_option: &str,
    ) -> Result<Survey, StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let selected_file = self.lock().selected_file.clone();
        let file = match selected_file {
            Some(file)
                if !title.trim().is_empty()
                    && !description.trim().is_empty()
                    && !payment_option.trim().is_empty() =>
            {
                file
            }
            _ => {
                return Err(StoreError::Validation(
                    "Please fill all fields and select a file".into(),
                ));
            }
        };

        let payload = serde_json::to_value(NewSurvey {
            title: title.into(),
            description: description.into(),
            payment_option: payment_option.into(),
            user_id,
            file,
        })?;

        self.set_loading(true);
        match self.api.create_survey(&payload).await {
            Ok(survey) => {
                let mut state = self.lock();
                state.surveys.insert(0, survey.clone());
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(survey)
            }
            Err(e) => {
                error!(error = %e, "failed to create survey");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Replace the collection with the current user's surveys.
    ///
    /// The backend returns everyone's surveys; ownership filtering happens
    /// here.
    pub async fn fetch_surveys(&self) -> Result<(), StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let seq = self.fetch_seq.begin();
        self.set_loading(true);

        match self.api.get_all_surveys().await {
            Ok(surveys) => {
                if self.fetch_seq.is_current(seq) {
                    let mine: Vec<Survey> = surveys
                        .into_iter()
                        .filter(|s| s.user_id == user_id)
                        .collect();
                    let mut state = self.lock();
                    state.surveys = mine;
                    state.loading = false;
                    drop(state);
                    self.listeners.notify();
                } else {
                    debug!(seq, "stale survey fetch discarded");
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch surveys");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Apply a partial edit server-side, then reconcile the returned record
    /// in place. An unknown survey id is a logged no-op.
    pub async fn update_survey(
        &self,
        survey_id: &str,
        updates: &SurveyUpdate,
    ) -> Result<(), StoreError> {
        if self.session.user_id().is_none() {
            return Err(StoreError::NotSignedIn);
        }

        let payload = serde_json::to_value(updates)?;
        let updated = self
            .api
            .update_survey(survey_id, &payload)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to update survey");
                e
            })?;

        let mut state = self.lock();
        match state.surveys.iter_mut().find(|s| s.id == survey_id) {
            Some(survey) => {
                *survey = updated;
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                warn!(survey_id, "survey not found; update not reconciled");
            }
        }
        Ok(())
    }

    /// Delete a survey server-side and drop it from the collection.
    pub async fn delete_survey(&self, survey_id: &str) -> Result<(), StoreError> {
        if self.session.user_id().is_none() {
            return Err(StoreError::NotSignedIn);
        }

        self.api.delete_survey(survey_id).await.map_err(|e| {
            error!(error = %e, "failed to delete survey");
            e
        })?;

        let mut state = self.lock();
        let before = state.surveys.len();
        state.surveys.retain(|s| s.id != survey_id);
        let removed = state.surveys.len() != before;
        drop(state);
        if removed {
            self.listeners.notify();
        } else {
            warn!(survey_id, "survey not found; nothing removed locally");
        }
        Ok(())
    }
}
