//! Survey form store — a draft survey under construction.
//!
//! Pure draft editor: nothing here touches the network until submission,
//! and the draft is discarded on submit or app restart. Validation
//! collects every violation into a field-path → message map so the UI can
//! attribute each error to its originating field.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use sauti_api_client::RemoteApi;

use crate::error::{FormErrors, StoreError};
use crate::listeners::{ListenerId, Listeners};
use crate::session::SessionStore;

/// Kind of answer a drafted question collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    Radio,
    Checkbox,
    MultipleChoice,
}

impl QuestionType {
    /// Whether this kind carries a list of options.
    pub fn has_options(self) -> bool {
        !matches!(self, QuestionType::Text)
    }
}

/// One question being drafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for QuestionDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            question_type: QuestionType::Text,
            options: Vec::new(),
        }
    }
}

/// The survey draft: a title plus its questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDraft {
    pub survey_title: String,
    pub questions: Vec<QuestionDraft>,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self {
            survey_title: String::new(),
            questions: vec![QuestionDraft::default()],
        }
    }
}

/// Validate a draft, collecting ALL violations (not fail-fast).
///
/// Paths follow the UI's attribution scheme: `surveyTitle`, `questions`,
/// `questions[i].question`, `questions[i].options`,
/// `questions[i].options[j]`.
pub fn validate_draft(draft: &SurveyDraft) -> FormErrors {
    let mut errors = FormErrors::new();

    if draft.survey_title.trim().is_empty() {
        errors.insert("surveyTitle", "Survey title is required");
    }

    if draft.questions.is_empty() {
        errors.insert("questions", "At least one question is required");
    }

    for (i, question) in draft.questions.iter().enumerate() {
        if question.question.trim().is_empty() {
            errors.insert(format!("questions[{i}].question"), "Question is required");
        }
        if question.question_type.has_options() {
            for (j, option) in question.options.iter().enumerate() {
                if option.trim().is_empty() {
                    errors.insert(format!("questions[{i}].options[{j}]"), "Option is required");
                }
            }
            if question.options.len() < 2 {
                errors.insert(
                    format!("questions[{i}].options"),
                    "At least two options are required",
                );
            }
        }
    }

    errors
}

struct FormState {
    draft: SurveyDraft,
    loading: bool,
    errors: FormErrors,
}

/// Store holding the survey draft and its validation state.
pub struct SurveyFormStore {
    api: Arc<dyn RemoteApi>,
    session: Arc<SessionStore>,
    state: Mutex<FormState>,
    listeners: Listeners,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormSubmission<'a> {
    survey_title: &'a str,
    questions: &'a [QuestionDraft],
    user_id: &'a str,
}

impl SurveyFormStore {
    pub fn new(api: Arc<dyn RemoteApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(FormState {
                draft: SurveyDraft::default(),
                loading: false,
                errors: FormErrors::new(),
            }),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn draft(&self) -> SurveyDraft {
        self.lock().draft.clone()
    }

    pub fn errors(&self) -> FormErrors {
        self.lock().errors.clone()
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

    pub fn set_title(&self, title: &str) {
        self.lock().draft.survey_title = title.to_string();
        self.listeners.notify();
    }

    /// Append an empty text question.
    pub fn add_question(&self) {
        self.lock().draft.questions.push(QuestionDraft::default());
        self.listeners.notify();
    }

    /// Remove a question. Out-of-range indexes are logged no-ops.
    pub fn remove_question(&self, index: usize) {
        let mut state = self.lock();
        if index < state.draft.questions.len() {
            state.draft.questions.remove(index);
            drop(state);
            self.listeners.notify();
        } else {
            debug!(index, "remove_question out of range");
        }
    }

    pub fn set_question_text(&self, index: usize, text: &str) {
        let mut state = self.lock();
        match state.draft.questions.get_mut(index) {
            Some(question) => {
                question.question = text.to_string();
                drop(state);
                self.listeners.notify();
            }
            None => debug!(index, "set_question_text out of range"),
        }
    }

    pub fn set_question_type(&self, index: usize, question_type: QuestionType) {
        let mut state = self.lock();
        match state.draft.questions.get_mut(index) {
            Some(question) => {
                question.question_type = question_type;
                drop(state);
                self.listeners.notify();
            }
            None => debug!(index, "set_question_type out of range"),
        }
    }

    /// Append an empty option to a question.
    pub fn add_option(&self, index: usize) {
        let mut state = self.lock();
        match state.draft.questions.get_mut(index) {
            Some(question) => {
                question.options.push(String::new());
                drop(state);
                self.listeners.notify();
            }
            None => debug!(index, "add_option out of range"),
        }
    }

    pub fn remove_option(&self, index: usize, option_index: usize) {
        let mut state = self.lock();
        match state.draft.questions.get_mut(index) {
            Some(question) if option_index < question.options.len() => {
                question.options.remove(option_index);
                drop(state);
                self.listeners.notify();
            }
            _ => debug!(index, option_index, "remove_option out of range"),
        }
    }

    pub fn set_option(&self, index: usize, option_index: usize, text: &str) {
        let mut state = self.lock();
        match state
            .draft
            .questions
            .get_mut(index)
            .and_then(|q| q.options.get_mut(option_index))
        {
            Some(option) => {
                *option = text.to_string();
                drop(state);
                self.listeners.notify();
            }
            None => debug!(index, option_index, "set_option out of range"),
        }
    }

    /// Validate the draft, storing the collected errors. Returns whether
    /// the draft is valid.
    pub fn validate(&self) -> bool {
        let mut state = self.lock();
        let errors = validate_draft(&state.draft);
        let valid = errors.is_empty();
        state.errors = errors;
        drop(state);
        self.listeners.notify();
        valid
    }

    /// Submit the draft. Only a validated draft reaches the network; on
    /// success the draft resets to its initial state.
    pub async fn submit(&self) -> Result<(), StoreError> {
        let user_id = self.session.user_id().ok_or(StoreError::NotSignedIn)?;

        if !self.validate() {
            return Err(StoreError::Form(self.errors()));
        }

        {
            let mut state = self.lock();
            state.loading = true;
        }
        self.listeners.notify();

        let draft = self.draft();
        let payload = serde_json::to_value(FormSubmission {
            survey_title: &draft.survey_title,
            questions: &draft.questions,
            user_id: &user_id,
        })?;

        match self.api.create_survey(&payload).await {
            Ok(_) => {
                let mut state = self.lock();
                state.draft = SurveyDraft::default();
                state.errors = FormErrors::new();
                state.loading = false;
                drop(state);
                self.listeners.notify();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to submit survey draft");
                self.lock().loading = false;
                self.listeners.notify();
                Err(e.into())
            }
        }
    }
}
