//! Vigil Core Library
//!
//! Domain models, configuration, error metadata, file validation and wizard
//! state machines shared by the Vigil client and CLI. Nothing in this crate
//! performs network I/O.

pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod models;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use config::{ClientConfig, FormConfig};
pub use error::{ErrorMetadata, LogLevel};
pub use events::{NoOpObserver, SubmissionEvent, SubmissionObserver, TracingObserver};
pub use format::format_file_size;
pub use models::{
    BatchStatus, CandidateFile, FormFields, FormPayload, SubmissionMeta, UploadBatch,
    UploadFailure, UploadSignature, UploadedAsset,
};
pub use validation::{
    FileConstraints, FileRejection, FileValidator, RejectedFile, ValidationReport,
};
pub use wizard::{AbuseReportForm, ScamReportForm, SubjectKind, Wizard, WizardError, WizardForm};
