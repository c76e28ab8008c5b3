//! In-memory file reference.

use serde::{Deserialize, Serialize};

/// A picked file crossing the store boundary.
///
/// Device file-picker integration lives in the host shell; by the time a
/// file reaches this layer it is bytes plus metadata. Only the metadata is
/// serialized — the bytes travel as multipart form data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub mime: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
        }
    }
}
