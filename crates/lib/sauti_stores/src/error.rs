//! Store error types.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use sauti_api_client::ApiError;
use sauti_core::notify::NotifyError;
use sauti_core::storage::StorageError;

/// Field-path → message map produced by collect-all form validation.
///
/// Paths follow the dotted/indexed scheme the UI attributes errors by:
/// `surveyTitle`, `questions`, `questions[0].question`,
/// `questions[0].options`, `questions[0].options[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by store operations.
///
/// Validation and sign-in preconditions fail before any network call;
/// everything else wraps a collaborator failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("You must be logged in")]
    NotSignedIn,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form validation failed: {0}")]
    Form(FormErrors),

    #[error("Api error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),
}
