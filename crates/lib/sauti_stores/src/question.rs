//! Question store — community questions and their responses.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use sauti_api_client::RemoteApi;
use sauti_core::models::{Question, QuestionResponse, QuestionUpload};
use sauti_core::timefmt::display_timestamp;

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};
use crate::session::SessionStore;
use crate::sync::FetchSeq;

struct QuestionState {
    questions: Vec<Question>,
    loading: bool,
}

/// Store of community questions, newest first.
///
/// Question timestamps are rewritten into the display format at every
/// reconciliation, so `created_at` in the collection is always the
/// formatted string, regardless of which operation inserted the record.
pub struct QuestionStore {
    api: Arc<dyn RemoteApi>,
    session: Arc<SessionStore>,
    state: Mutex<QuestionState>,
    fetch_seq: FetchSeq,
    listeners: Listeners,
}

impl QuestionStore {
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(QuestionState {
                questions: Vec::new(),
                loading: false,
            }),
            fetch_seq: FetchSeq::new(),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QuestionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
        self.listeners.notify();
    }

    /// Snapshot of the collection.
    pub fn questions(&self) -> Vec<Question> {
        self.lock().questions.clone()
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

    /// Replace the collection with the server's question list.
    pub async fn fetch_questions(&self) -> Result<(), StoreError> {
        let seq = self.fetch_seq.begin();
        self.set_loading(true);

        match self.api.get_all_questions().await {
            Ok(mut questions) => {
                if self.fetch_seq.is_current(seq) {
                    for question in &mut questions {
                        question.created_at = display_timestamp(&question.created_at);
                    }
                    let mut state = self.lock();
                    state.questions = questions;
                    state.loading = false;
                    drop(state);
                    self.listeners.notify();
                } else {
                    debug!(seq, "stale question fetch discarded");
                    self.set_loading(false);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch questions");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Submit a new question; the server's record is prepended.
    pub async fn submit_question(&self, text: &str) -> Result<Question, StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let mut question = self.api.submit_question(text, &user_id).await.map_err(|e| {
            error!(error = %e, "failed to submit question");
            e
        })?;
        question.created_at = display_timestamp(&question.created_at);
        question.responses.clear();

        self.lock().questions.insert(0, question.clone());
        self.listeners.notify();
        Ok(question)
    }

    /// Fetch the responses of one question and splice them into it.
    ///
    /// An unknown question id is a logged no-op.
    pub async fn fetch_responses(&self, question_id: &str) -> Result<(), StoreError> {
        let mut responses = self.api.get_responses(question_id).await.map_err(|e| {
            error!(error = %e, "failed to fetch responses");
            e
        })?;
        for response in &mut responses {
            response.question_id = question_id.to_string();
        }

        let mut state = self.lock();
        match state.questions.iter_mut().find(|q| q.id == question_id) {
            Some(question) => {
                question.responses = responses;
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                warn!(question_id, "question not found; fetched responses discarded");
            }
        }
        Ok(())
    }

    /// Bulk-upload questions after local validation.
    ///
    /// Every record must carry non-empty text and a user id; otherwise the
    /// upload is rejected without a network round trip.
    pub async fn upload_questions(&self, uploads: &[QuestionUpload]) -> Result<(), StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let valid = uploads
            .iter()
            .all(|u| !u.text.trim().is_empty() && !u.user_id.trim().is_empty());
        if !valid {
            return Err(StoreError::Validation(
                "Each uploaded question must have text and a user id".into(),
            ));
        }

        self.set_loading(true);
        let result = self.api.upload_questions(uploads, &user_id).await;
        match result {
            Ok(mut uploaded) => {
                for question in &mut uploaded {
                    question.created_at = display_timestamp(&question.created_at);
                    question.responses.clear();
                }
                let mut state = self.lock();
                for (i, question) in uploaded.into_iter().enumerate() {
                    state.questions.insert(i, question);
                }
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to upload questions");
                self.set_loading(false);
                Err(e.into())
            }
        }
    }

    /// Submit a response to a question; the server's record is prepended to
    /// the question's response list. An unknown question id is a logged
    /// no-op.
    pub async fn submit_response(
        &self,
        question_id: &str,
        response_text: &str,
    ) -> Result<QuestionResponse, StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        let mut response = self
            .api
            .submit_response(question_id, response_text, &user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to submit response");
                e
            })?;
        response.question_id = question_id.to_string();

        let mut state = self.lock();
        match state.questions.iter_mut().find(|q| q.id == question_id) {
            Some(question) => {
                question.responses.insert(0, response.clone());
                drop(state);
                self.listeners.notify();
            }
            None => {
                drop(state);
                warn!(question_id, "question not found; submitted response not spliced");
            }
        }
        Ok(response)
    }
}
