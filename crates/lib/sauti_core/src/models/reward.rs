//! Reward models.

use serde::{Deserialize, Serialize};

/// A claimable engagement reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub claimed: bool,
}
