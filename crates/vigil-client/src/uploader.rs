//! Upload orchestration
//!
//! Validates a selection, fetches one signature for the whole batch, then
//! uploads every valid file concurrently. One file failing never affects its
//! siblings; only a failed signature fetch sinks the whole batch.

use futures::future::join_all;
use std::sync::Arc;
use vigil_core::{
    CandidateFile, FileConstraints, FileValidator, NoOpObserver, SubmissionEvent,
    SubmissionObserver, UploadBatch, UploadFailure,
};

use crate::asset_host::{AssetHost, UploadOptions};
use crate::signature::SignatureSource;

pub struct UploadOrchestrator {
    validator: FileValidator,
    signatures: Arc<dyn SignatureSource>,
    host: Arc<dyn AssetHost>,
    options: UploadOptions,
    observer: Arc<dyn SubmissionObserver>,
}

impl UploadOrchestrator {
    pub fn new(
        constraints: FileConstraints,
        signatures: Arc<dyn SignatureSource>,
        host: Arc<dyn AssetHost>,
        options: UploadOptions,
    ) -> Self {
        Self {
            validator: FileValidator::new(constraints),
            signatures,
            host,
            options,
            observer: Arc::new(NoOpObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    /// Validate and upload `files`.
    ///
    /// `already_selected` is the number of files the caller already holds,
    /// counted against the file limit.
    pub async fn upload_all(
        &self,
        files: Vec<CandidateFile>,
        already_selected: usize,
    ) -> UploadBatch {
        let report = self.validator.validate_all(files, already_selected);
        for rejected in &report.invalid_files {
            self.observer.notify(&SubmissionEvent::FileRejected {
                file_name: rejected.file.name.clone(),
                reason: rejected.reason.to_string(),
            });
        }

        let mut batch = UploadBatch {
            rejected: report.invalid_files,
            ..Default::default()
        };

        let valid = report.valid_files;
        if valid.is_empty() {
            tracing::debug!(
                rejected = batch.rejected.len(),
                "No valid files to upload"
            );
            return batch;
        }

        self.observer.notify(&SubmissionEvent::UploadStarted {
            file_count: valid.len(),
        });

        let signature = match self.signatures.fetch_signature().await {
            Ok(signature) => signature,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch upload signature");
                let message = e.to_string();
                self.observer.notify(&SubmissionEvent::AuthorizationFailed {
                    message: message.clone(),
                });
                batch.authorization_error = Some(message);
                return batch;
            }
        };

        tracing::info!(file_count = valid.len(), "Uploading files");

        let uploads = valid
            .iter()
            .map(|file| self.host.upload(file, &signature, &self.options));
        let results = join_all(uploads).await;

        for (file, result) in valid.iter().zip(results) {
            match result {
                Ok(asset) => {
                    tracing::debug!(file_name = %asset.file_name, "File uploaded");
                    batch.uploaded.push(asset);
                }
                Err(e) => {
                    tracing::warn!(file_name = %file.name, error = %e, "File upload failed");
                    batch.failures.push(UploadFailure {
                        file_name: file.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            uploaded = batch.uploaded.len(),
            failed = batch.failures.len(),
            "Upload batch finished"
        );
        self.observer.notify(&SubmissionEvent::UploadFinished {
            status: batch.status(),
            uploaded: batch.uploaded.len(),
            failures: batch.failures.clone(),
        });

        batch
    }
}
