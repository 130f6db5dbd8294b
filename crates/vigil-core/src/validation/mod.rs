//! Evidence file validation
//!
//! Pure checks run before anything is uploaded. A rejected file is reported
//! to the user but never blocks the other files in the same selection.

mod content_types;

pub use content_types::{content_type_for_extension, content_type_for_name};

use serde::Serialize;

use crate::config::{DEFAULT_ALLOWED_FILE_TYPES, DEFAULT_MAX_FILE_SIZE};
use crate::error::{ErrorMetadata, LogLevel};
use crate::format::format_file_size;
use crate::models::CandidateFile;

fn human(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// Why a file was not accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("\"{name}\" is too large ({}). Maximum size is {}", human(.size), human(.limit))]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("\"{name}\" was not added: at most {max_files} files can be attached")]
    TooMany { name: String, max_files: usize },

    #[error("\"{name}\" has a file type that is not allowed ({content_type})")]
    TypeNotAllowed { name: String, content_type: String },

    #[error("\"{name}\" is empty")]
    Empty { name: String },

    #[error("\"{name}\" has a name longer than {max_length} characters")]
    NameTooLong { name: String, max_length: usize },

    #[error("\"{name}\" would bring the total upload size over {}", human(.limit))]
    AggregateTooLarge { name: String, limit: u64 },
}

impl FileRejection {
    /// Name of the rejected file
    pub fn file_name(&self) -> &str {
        match self {
            FileRejection::TooLarge { name, .. }
            | FileRejection::TooMany { name, .. }
            | FileRejection::TypeNotAllowed { name, .. }
            | FileRejection::Empty { name }
            | FileRejection::NameTooLong { name, .. }
            | FileRejection::AggregateTooLarge { name, .. } => name,
        }
    }
}

impl ErrorMetadata for FileRejection {
    fn error_code(&self) -> &'static str {
        match self {
            FileRejection::TooLarge { .. } => "FILE_TOO_LARGE",
            FileRejection::TooMany { .. } => "TOO_MANY_FILES",
            FileRejection::TypeNotAllowed { .. } => "FILE_TYPE_NOT_ALLOWED",
            FileRejection::Empty { .. } => "EMPTY_FILE",
            FileRejection::NameTooLong { .. } => "FILE_NAME_TOO_LONG",
            FileRejection::AggregateTooLarge { .. } => "TOTAL_SIZE_EXCEEDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Limits applied to a selection of evidence files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConstraints {
    pub max_file_size: u64,
    /// MIME types, `category/*` wildcards, `*/*`, or `.ext` extensions
    pub allowed_types: Vec<String>,
    pub max_files: usize,
    pub reject_empty: bool,
    pub max_name_length: Option<usize>,
    pub max_total_size: Option<u64>,
}

impl Default for FileConstraints {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_files: 5,
            reject_empty: true,
            max_name_length: None,
            max_total_size: None,
        }
    }
}

/// A file that failed validation, returned together with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    #[serde(rename = "file_name", serialize_with = "serialize_file_name")]
    pub file: CandidateFile,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: FileRejection,
}

fn serialize_file_name<S: serde::Serializer>(
    file: &CandidateFile,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&file.name)
}

fn serialize_reason<S: serde::Serializer>(
    reason: &FileRejection,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Partition of a selection into accepted and rejected files.
///
/// Files are moved, not copied: every input file ends up in exactly one list.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid_files: Vec<CandidateFile>,
    pub invalid_files: Vec<RejectedFile>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_files.is_empty()
    }
}

/// Evidence file validator
///
/// Rules run in a fixed order and the first failing rule wins: size, count,
/// type, then the optional empty-file, name-length and total-size checks.
#[derive(Debug, Clone)]
pub struct FileValidator {
    constraints: FileConstraints,
}

impl FileValidator {
    pub fn new(constraints: FileConstraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &FileConstraints {
        &self.constraints
    }

    /// Validate one file given how many files are already selected.
    pub fn validate(
        &self,
        file: &CandidateFile,
        already_selected: usize,
    ) -> Result<(), FileRejection> {
        self.check(file, already_selected, 0)
    }

    /// Validate a selection, counting each accepted file toward the count and
    /// total-size limits seen by the files after it.
    pub fn validate_all(
        &self,
        files: Vec<CandidateFile>,
        already_selected: usize,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut selected = already_selected;
        let mut selected_bytes = 0u64;

        for file in files {
            match self.check(&file, selected, selected_bytes) {
                Ok(()) => {
                    selected = selected.saturating_add(1);
                    selected_bytes = selected_bytes.saturating_add(file.size());
                    report.valid_files.push(file);
                }
                Err(reason) => {
                    tracing::debug!(
                        file_name = %file.name,
                        code = reason.error_code(),
                        "File rejected"
                    );
                    report.invalid_files.push(RejectedFile { file, reason });
                }
            }
        }

        report
    }

    fn check(
        &self,
        file: &CandidateFile,
        selected: usize,
        selected_bytes: u64,
    ) -> Result<(), FileRejection> {
        let c = &self.constraints;
        let size = file.size();

        if size > c.max_file_size {
            return Err(FileRejection::TooLarge {
                name: file.name.clone(),
                size,
                limit: c.max_file_size,
            });
        }

        if selected >= c.max_files {
            return Err(FileRejection::TooMany {
                name: file.name.clone(),
                max_files: c.max_files,
            });
        }

        if !self.type_allowed(file) {
            return Err(FileRejection::TypeNotAllowed {
                name: file.name.clone(),
                content_type: file.content_type.clone(),
            });
        }

        if c.reject_empty && size == 0 {
            return Err(FileRejection::Empty {
                name: file.name.clone(),
            });
        }

        if let Some(max_length) = c.max_name_length {
            if file.name.chars().count() > max_length {
                return Err(FileRejection::NameTooLong {
                    name: file.name.clone(),
                    max_length,
                });
            }
        }

        if let Some(limit) = c.max_total_size {
            if selected_bytes.saturating_add(size) > limit {
                return Err(FileRejection::AggregateTooLarge {
                    name: file.name.clone(),
                    limit,
                });
            }
        }

        Ok(())
    }

    fn type_allowed(&self, file: &CandidateFile) -> bool {
        let mime = file.mime_essence();
        let extension = file.extension();

        self.constraints.allowed_types.iter().any(|entry| {
            let entry = entry.trim().to_lowercase();
            if entry == "*/*" || entry == "*" {
                true
            } else if let Some(ext) = entry.strip_prefix('.') {
                extension.as_deref() == Some(ext)
            } else if let Some(category) = entry.strip_suffix('*') {
                // "image/*" keeps its slash so "imagex/png" does not match
                category.ends_with('/') && mime.starts_with(category)
            } else {
                entry == mime
            }
        })
    }
}
