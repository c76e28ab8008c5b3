//! Survey models.

use serde::{Deserialize, Serialize};

use super::FileRef;

/// A published survey, scoped to its owning user.
///
/// `description` and `payment_option` default to empty because surveys
/// created through the drafted-questions form flow carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Compensation tag chosen at creation (e.g. airtime, mobile money).
    #[serde(default)]
    pub payment_option: String,
    pub user_id: String,
    /// Server-side reference to the attached file, when one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Payload for `create-survey` (builder flow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    pub title: String,
    pub description: String,
    pub payment_option: String,
    pub user_id: String,
    pub file: FileRef,
}

/// Partial survey edit for `update-survey`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_option: Option<String>,
}
