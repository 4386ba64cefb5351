use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pointer to the PDF most recently uploaded in a browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReference {
    /// Sanitized filename as written to disk
    pub filename: String,
    /// Absolute path of the stored file
    pub path: PathBuf,
}

/// Everything kept in the signed session cookie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<UploadReference>,
}
