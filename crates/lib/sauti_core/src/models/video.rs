//! Video and comment models.

use serde::{Deserialize, Serialize};

/// A published video with its engagement counters and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub views: i64,
    /// Thumbnail URI, lazily computed by the host shell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub video_source: String,
    pub user_id: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub is_bookmarked: bool,
}

/// A comment attached to a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub user_id: String,
    /// Back-reference to the owning video.
    #[serde(default)]
    pub video_id: String,
}
