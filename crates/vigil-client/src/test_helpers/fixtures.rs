//! Shared test data

use vigil_core::{CandidateFile, UploadSignature};

/// A file of `size` bytes with the given declared type.
pub fn candidate(name: &str, content_type: &str, size: usize) -> CandidateFile {
    CandidateFile::new(name, content_type, vec![b'x'; size])
}

pub fn png(name: &str) -> CandidateFile {
    candidate(name, "image/png", 128)
}

pub fn signature() -> UploadSignature {
    UploadSignature {
        signature: "sig-abc123".to_string(),
        timestamp: 1_700_000_000,
        cloud_name: "demo".to_string(),
        api_key: "api-key".to_string(),
        upload_preset: "reports".to_string(),
    }
}

/// Asset URL the mock host returns for `name`.
pub fn asset_url(name: &str) -> String {
    format!("https://assets.example/demo/{}", name)
}
