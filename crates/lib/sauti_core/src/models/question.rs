//! Question and response models.

use serde::{Deserialize, Serialize};

/// A community question with its responses, newest response first.
///
/// `created_at` arrives as an RFC 3339 wire timestamp; the question store
/// rewrites it into the display format at reconciliation time (see
/// [`crate::timefmt`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub responses: Vec<QuestionResponse>,
}

/// A response attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: String,
    pub response_text: String,
    pub user_id: String,
    /// Back-reference to the owning question, not an ownership relation.
    #[serde(default)]
    pub question_id: String,
    /// Author summary embedded by the backend on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ResponseAuthor>,
    #[serde(default)]
    pub created_at: String,
}

/// Embedded author summary on a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseAuthor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// One record of a bulk question upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpload {
    pub text: String,
    pub user_id: String,
}
