use serde::{Deserialize, Serialize};

use crate::validation::RejectedFile;

/// A file stored by the asset host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub file_name: String,
    pub secure_url: String,
}

/// A file the asset host did not store, with the reason it gave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

/// Overall outcome of one upload batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No file survived validation, nothing was sent
    Empty,
    /// Signature fetch failed, nothing was sent
    Unauthorized,
    /// Every file uploaded
    Complete,
    /// Some files uploaded, some failed
    Partial,
    /// Every attempted upload failed
    Failed,
}

/// Aggregated result of an upload batch.
///
/// `uploaded` has no positional correspondence with the input files; callers
/// must not pair them by index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadBatch {
    pub uploaded: Vec<UploadedAsset>,
    pub failures: Vec<UploadFailure>,
    pub rejected: Vec<RejectedFile>,
    /// Set when the signature could not be obtained
    pub authorization_error: Option<String>,
}

impl UploadBatch {
    pub fn urls(&self) -> Vec<String> {
        self.uploaded.iter().map(|a| a.secure_url.clone()).collect()
    }

    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failures.len()
    }

    pub fn status(&self) -> BatchStatus {
        if self.authorization_error.is_some() {
            return BatchStatus::Unauthorized;
        }
        match (self.uploaded.len(), self.failures.len()) {
            (0, 0) => BatchStatus::Empty,
            (_, 0) => BatchStatus::Complete,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::Partial,
        }
    }
}
