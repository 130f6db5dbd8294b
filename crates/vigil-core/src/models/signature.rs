use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Short-lived upload authorization issued by the trusted signature endpoint.
///
/// Fetched once per upload batch and shared by every file in it. Validity is
/// enforced by the asset host against `timestamp`; this type never caches it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub signature: String,
    /// Unix seconds
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
    pub upload_preset: String,
}

impl Debug for UploadSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UploadSignature")
            .field("timestamp", &self.timestamp)
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &self.upload_preset)
            .finish_non_exhaustive()
    }
}
