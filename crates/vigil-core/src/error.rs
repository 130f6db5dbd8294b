//! Error metadata shared by the Vigil error types
//!
//! Each concern defines its own `thiserror` enum (`FileRejection`,
//! `SignatureError`, `SubmitError`, ...). `ErrorMetadata` lets callers treat
//! them uniformly when deciding what to show the user and how loudly to log.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a single failed upload
    Warn,
    /// Error level - for failures that abort a submission
    Error,
}

/// Describes how an error should be presented and logged
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether the user can fix this by changing input and trying again
    fn is_recoverable(&self) -> bool;

    /// User-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event for `err` at the level it asks for.
pub fn log_error<E: ErrorMetadata + std::fmt::Display>(err: &E) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code = err.error_code(), error = %err, "Operation failed"),
        LogLevel::Warn => tracing::warn!(code = err.error_code(), error = %err, "Operation failed"),
        LogLevel::Error => tracing::error!(code = err.error_code(), error = %err, "Operation failed"),
    }
}
