//! Test helpers: point every HTTP collaborator at one mock server.
//!
//! Run with `cargo test -p vigil-client --test submit_flow_test`.

use mockito::{Mock, ServerGuard};
use std::sync::Arc;
use vigil_client::{build_submitter, FormSubmitter};
use vigil_core::{CandidateFile, ClientConfig, FormConfig, NoOpObserver};

pub const SIGNATURE_PATH: &str = "/api/upload-signature";
pub const RELAY_PATH: &str = "/submit";
pub const UPLOAD_PATH: &str = "/demo/auto/upload";

pub const SIGNATURE_BODY: &str = r#"{"signature":"sig-abc123","timestamp":1700000000,"cloudName":"demo","apiKey":"api-key","uploadPreset":"reports"}"#;

/// Client configuration whose endpoints all live on `server`.
pub fn client_config(server: &ServerGuard) -> ClientConfig {
    ClientConfig {
        signature_url: format!("{}{}", server.url(), SIGNATURE_PATH),
        upload_base_url: server.url(),
        relay_url: format!("{}{}", server.url(), RELAY_PATH),
        http_timeout_secs: 5,
        ..Default::default()
    }
}

pub fn form_config() -> FormConfig {
    FormConfig::new("test-access-key", "Scam Report")
}

pub fn submitter(server: &ServerGuard, form: FormConfig) -> FormSubmitter {
    build_submitter(&client_config(server), form, Arc::new(NoOpObserver))
        .expect("valid test configuration")
}

pub fn png(name: &str) -> CandidateFile {
    CandidateFile::new(name, "image/png", b"fake png bytes".to_vec())
}

pub async fn mock_signature(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", SIGNATURE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SIGNATURE_BODY)
        .create_async()
        .await
}

pub async fn mock_relay_success(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", RELAY_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"Email sent successfully!"}"#)
        .create_async()
        .await
}
