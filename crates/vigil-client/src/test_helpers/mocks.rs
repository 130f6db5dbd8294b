//! In-memory implementations of the client traits
//!
//! Each mock records its calls so tests can assert on how many network
//! round-trips the code under test would have made.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use vigil_core::{
    CandidateFile, FormPayload, SubmissionEvent, SubmissionObserver, UploadSignature,
    UploadedAsset,
};

use super::fixtures::{asset_url, signature};
use crate::asset_host::{AssetHost, AssetHostError, UploadOptions};
use crate::relay::{FormRelay, RelayError, RelayResponse};
use crate::signature::{SignatureError, SignatureSource};

/// Signature source that counts calls and can be told to fail
#[derive(Clone, Default)]
pub struct MockSignatureSource {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockSignatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignatureSource for MockSignatureSource {
    async fn fetch_signature(&self) -> Result<UploadSignature, SignatureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SignatureError::Status {
                status: 500,
                body: "signing unavailable".to_string(),
            });
        }
        Ok(signature())
    }
}

/// Asset host that stores everything except the files named in `fail_names`
#[derive(Clone, Default)]
pub struct MockAssetHost {
    fail_names: HashSet<String>,
    uploads: Arc<Mutex<Vec<(String, UploadOptions)>>>,
}

impl MockAssetHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            fail_names: names.iter().map(|n| n.to_string()).collect(),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn options_seen(&self) -> Vec<UploadOptions> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, options)| options.clone())
            .collect()
    }
}

#[async_trait]
impl AssetHost for MockAssetHost {
    async fn upload(
        &self,
        file: &CandidateFile,
        _signature: &UploadSignature,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, AssetHostError> {
        self.uploads
            .lock()
            .unwrap()
            .push((file.name.clone(), options.clone()));

        if self.fail_names.contains(&file.name) {
            return Err(AssetHostError::Rejected(format!(
                "Invalid image file: {}",
                file.name
            )));
        }
        Ok(UploadedAsset {
            file_name: file.name.clone(),
            secure_url: asset_url(&file.name),
        })
    }
}

/// Asset host whose uploads only complete once `n` of them are in flight
#[derive(Clone)]
pub struct BarrierAssetHost {
    barrier: Arc<Barrier>,
}

impl BarrierAssetHost {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Arc::new(Barrier::new(n)),
        }
    }
}

#[async_trait]
impl AssetHost for BarrierAssetHost {
    async fn upload(
        &self,
        file: &CandidateFile,
        _signature: &UploadSignature,
        _options: &UploadOptions,
    ) -> Result<UploadedAsset, AssetHostError> {
        self.barrier.wait().await;
        Ok(UploadedAsset {
            file_name: file.name.clone(),
            secure_url: asset_url(&file.name),
        })
    }
}

/// Relay that records every payload and answers with a fixed response
#[derive(Clone)]
pub struct RecordingRelay {
    response: RelayResponse,
    payloads: Arc<Mutex<Vec<FormPayload>>>,
}

impl RecordingRelay {
    pub fn accepting() -> Self {
        Self::with_response(RelayResponse {
            success: true,
            message: Some("Email sent successfully!".to_string()),
        })
    }

    pub fn rejecting(message: &str) -> Self {
        Self::with_response(RelayResponse {
            success: false,
            message: Some(message.to_string()),
        })
    }

    fn with_response(response: RelayResponse) -> Self {
        Self {
            response,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn last_payload(&self) -> Option<FormPayload> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl FormRelay for RecordingRelay {
    async fn submit(&self, payload: &FormPayload) -> Result<RelayResponse, RelayError> {
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(self.response.clone())
    }
}

/// Observer that keeps every event in order
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SubmissionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SubmissionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SubmissionObserver for RecordingObserver {
    fn notify(&self, event: &SubmissionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
