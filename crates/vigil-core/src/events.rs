//! Submission events
//!
//! The orchestration core reports progress as `SubmissionEvent`s instead of
//! showing notifications itself. A presentation layer implements
//! `SubmissionObserver` and turns events into toasts, log lines or CLI output.

use serde::Serialize;

use crate::models::{BatchStatus, UploadFailure};

/// Something the user should be told about, in the order it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SubmissionEvent {
    /// Files were supplied to a form that does not accept attachments
    AttachmentsNotAllowed,
    /// One file failed validation; emitted before any upload starts
    FileRejected { file_name: String, reason: String },
    /// Upload of the valid files is starting
    UploadStarted { file_count: usize },
    /// The upload signature could not be obtained; nothing was uploaded
    AuthorizationFailed { message: String },
    /// Every upload in the batch has settled
    UploadFinished {
        status: BatchStatus,
        uploaded: usize,
        failures: Vec<UploadFailure>,
    },
    /// The payload is being posted to the relay
    SubmissionStarted,
    SubmissionSucceeded,
    SubmissionFailed { reason: String },
}

/// Receives submission events. Implementations must not block.
pub trait SubmissionObserver: Send + Sync {
    fn notify(&self, event: &SubmissionEvent);
}

/// Observer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl SubmissionObserver for NoOpObserver {
    fn notify(&self, _event: &SubmissionEvent) {}
}

/// Observer that renders events as tracing log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SubmissionObserver for TracingObserver {
    fn notify(&self, event: &SubmissionEvent) {
        match event {
            SubmissionEvent::AttachmentsNotAllowed => {
                tracing::warn!("This form does not accept file attachments")
            }
            SubmissionEvent::FileRejected { file_name, reason } => {
                tracing::warn!(file_name = %file_name, "{}", reason)
            }
            SubmissionEvent::UploadStarted { file_count } => {
                tracing::info!(file_count, "Uploading files")
            }
            SubmissionEvent::AuthorizationFailed { message } => {
                tracing::error!(error = %message, "Could not authorize upload")
            }
            SubmissionEvent::UploadFinished {
                status,
                uploaded,
                failures,
            } => {
                for failure in failures {
                    tracing::warn!(
                        file_name = %failure.file_name,
                        error = %failure.error,
                        "File upload failed"
                    );
                }
                match status {
                    BatchStatus::Complete => tracing::info!(uploaded, "All files uploaded"),
                    BatchStatus::Partial => tracing::warn!(
                        uploaded,
                        failed = failures.len(),
                        "Some files failed to upload"
                    ),
                    _ => tracing::error!("No files were uploaded"),
                }
            }
            SubmissionEvent::SubmissionStarted => tracing::info!("Submitting form"),
            SubmissionEvent::SubmissionSucceeded => tracing::info!("Form submitted successfully"),
            SubmissionEvent::SubmissionFailed { reason } => {
                tracing::error!(reason = %reason, "Form submission failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = SubmissionEvent::FileRejected {
            file_name: "a.exe".to_string(),
            reason: "File type not allowed".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "file_rejected");
        assert_eq!(value["file_name"], "a.exe");
    }

    #[test]
    fn upload_finished_serializes_status() {
        let event = SubmissionEvent::UploadFinished {
            status: BatchStatus::Partial,
            uploaded: 1,
            failures: vec![],
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["status"], "partial");
    }
}
