//! Form submission
//!
//! Uploads any attached evidence, builds the relay payload and posts it.
//! `try_submit` returns a structured result; `submit` is the boolean
//! boundary used by presentation code and never lets an error escape.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use vigil_core::error::log_error;
use vigil_core::{
    CandidateFile, ErrorMetadata, FormConfig, FormFields, FormPayload, LogLevel, NoOpObserver,
    SubmissionEvent, SubmissionMeta, SubmissionObserver, UploadBatch,
};

use crate::relay::{FormRelay, RelayError};
use crate::uploader::UploadOrchestrator;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("This form does not accept file attachments")]
    AttachmentsNotAllowed,

    #[error("Upload authorization failed: {0}")]
    Unauthorized(String),

    #[error("None of the {supplied} attached file(s) could be uploaded")]
    NoFilesUploaded { supplied: usize },

    #[error("Form submission was rejected: {0}")]
    RelayRejected(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl ErrorMetadata for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            SubmitError::AttachmentsNotAllowed => "ATTACHMENTS_NOT_ALLOWED",
            SubmitError::Unauthorized(_) => "UPLOAD_UNAUTHORIZED",
            SubmitError::NoFilesUploaded { .. } => "NO_FILES_UPLOADED",
            SubmitError::RelayRejected(_) => "SUBMISSION_REJECTED",
            SubmitError::Relay(_) => "RELAY_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubmitError::AttachmentsNotAllowed | SubmitError::NoFilesUploaded { .. }
        )
    }

    fn client_message(&self) -> String {
        match self {
            SubmitError::Relay(_) => {
                "Could not reach the submission service. Please try again.".to_string()
            }
            SubmitError::Unauthorized(_) => {
                "Could not authorize the file upload. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmitError::AttachmentsNotAllowed => LogLevel::Debug,
            SubmitError::RelayRejected(_) | SubmitError::NoFilesUploaded { .. } => LogLevel::Warn,
            SubmitError::Unauthorized(_) | SubmitError::Relay(_) => LogLevel::Error,
        }
    }
}

/// Outcome of an accepted submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub payload: FormPayload,
    /// Present when files were attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<UploadBatch>,
    pub relay_message: Option<String>,
}

pub struct FormSubmitter {
    form: FormConfig,
    site_id: String,
    uploader: UploadOrchestrator,
    relay: Arc<dyn FormRelay>,
    observer: Arc<dyn SubmissionObserver>,
}

impl FormSubmitter {
    pub fn new(
        form: FormConfig,
        site_id: String,
        uploader: UploadOrchestrator,
        relay: Arc<dyn FormRelay>,
    ) -> Self {
        Self {
            form,
            site_id,
            uploader,
            relay,
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Route events from this submitter and its uploader to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.uploader = self.uploader.with_observer(observer.clone());
        self.observer = observer;
        self
    }

    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    pub fn uploader(&self) -> &UploadOrchestrator {
        &self.uploader
    }

    /// Submit and report only whether the relay accepted the form.
    pub async fn submit(&self, fields: &FormFields, files: Vec<CandidateFile>) -> bool {
        match self.try_submit(fields, files).await {
            Ok(_) => true,
            Err(e) => {
                log_error(&e);
                false
            }
        }
    }

    pub async fn try_submit(
        &self,
        fields: &FormFields,
        files: Vec<CandidateFile>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let supplied = files.len();

        if supplied > 0 && !self.form.allow_files {
            self.observer.notify(&SubmissionEvent::AttachmentsNotAllowed);
            return Err(SubmitError::AttachmentsNotAllowed);
        }

        let batch = if supplied > 0 {
            let batch = self.uploader.upload_all(files, 0).await;
            if batch.uploaded.is_empty() {
                let err = match &batch.authorization_error {
                    Some(message) => SubmitError::Unauthorized(message.clone()),
                    None => SubmitError::NoFilesUploaded { supplied },
                };
                return Err(self.fail(err));
            }
            Some(batch)
        } else {
            None
        };

        let urls = batch.as_ref().map(UploadBatch::urls).unwrap_or_default();
        let payload = FormPayload::build(
            fields,
            &self.form,
            SubmissionMeta {
                urls: &urls,
                file_count: supplied,
                source: &self.site_id,
                submitted_at: Utc::now(),
            },
        );

        self.observer.notify(&SubmissionEvent::SubmissionStarted);
        tracing::info!(
            form_name = %self.form.form_name,
            file_count = supplied,
            uploaded = urls.len(),
            "Submitting form"
        );

        let response = match self.relay.submit(&payload).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e.into())),
        };

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Submission failed".to_string());
            return Err(self.fail(SubmitError::RelayRejected(message)));
        }

        self.observer.notify(&SubmissionEvent::SubmissionSucceeded);
        Ok(SubmissionReceipt {
            payload,
            batch,
            relay_message: response.message,
        })
    }

    fn fail(&self, err: SubmitError) -> SubmitError {
        self.observer.notify(&SubmissionEvent::SubmissionFailed {
            reason: err.client_message(),
        });
        err
    }
}
