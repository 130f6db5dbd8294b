//! Configuration module
//!
//! Endpoint configuration for the HTTP collaborators (`ClientConfig`) and
//! per-form configuration (`FormConfig`). Both are plain structs passed into
//! the components that need them; `from_env` exists for binaries only.

use std::env;

use crate::validation::FileConstraints;

// Common constants
const MAX_FILE_SIZE_MB: u64 = 10;
const MAX_FILES: usize = 5;
const HTTP_TIMEOUT_SECS: u64 = 60;

const DEFAULT_SIGNATURE_URL: &str = "http://localhost:3000/api/upload-signature";
const DEFAULT_UPLOAD_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";
const DEFAULT_UPLOAD_FOLDER: &str = "scam-reports";
const DEFAULT_UPLOAD_TAGS: &str = "scam-report,user-evidence";
const DEFAULT_SITE_ID: &str = "vigil-web";
const DEFAULT_MEDIA_FIELD: &str = "attachments";

/// Default per-file size limit (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;

/// Common image, document and spreadsheet formats
pub const DEFAULT_ALLOWED_FILE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
    "text/plain",
];

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn mb_to_bytes(name: &str, mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large ({} MB)", name, mb))
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Endpoints and fixed upload metadata shared by every form.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Trusted same-origin endpoint issuing upload signatures
    pub signature_url: String,
    /// Asset host API root; the cloud name from the signature is appended
    pub upload_base_url: String,
    /// Forms relay submission endpoint
    pub relay_url: String,
    /// Destination folder on the asset host
    pub upload_folder: String,
    pub upload_tags: Vec<String>,
    /// Origin site identifier sent with every submission
    pub site_id: String,
    pub http_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signature_url: DEFAULT_SIGNATURE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            upload_tags: split_list(DEFAULT_UPLOAD_TAGS),
            site_id: DEFAULT_SITE_ID.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ClientConfig {
            signature_url: env::var("VIGIL_SIGNATURE_URL")
                .unwrap_or_else(|_| DEFAULT_SIGNATURE_URL.to_string()),
            upload_base_url: env::var("VIGIL_UPLOAD_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            relay_url: env::var("VIGIL_RELAY_URL")
                .unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string()),
            upload_folder: env::var("VIGIL_UPLOAD_FOLDER")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_FOLDER.to_string()),
            upload_tags: split_list(
                &env::var("VIGIL_UPLOAD_TAGS").unwrap_or_else(|_| DEFAULT_UPLOAD_TAGS.to_string()),
            ),
            site_id: env::var("VIGIL_SITE_ID").unwrap_or_else(|_| DEFAULT_SITE_ID.to_string()),
            http_timeout_secs: env::var("VIGIL_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, url) in [
            ("VIGIL_SIGNATURE_URL", &self.signature_url),
            ("VIGIL_UPLOAD_BASE_URL", &self.upload_base_url),
            ("VIGIL_RELAY_URL", &self.relay_url),
        ] {
            if !is_http_url(url) {
                return Err(anyhow::anyhow!(
                    "{} must be an http(s) URL, got '{}'",
                    name,
                    url
                ));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "VIGIL_HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }

        Ok(())
    }

    /// Comma-joined tags as the asset host expects them.
    pub fn tags_param(&self) -> String {
        self.upload_tags.join(",")
    }
}

/// Per-form configuration: relay credentials and attachment policy.
#[derive(Clone)]
pub struct FormConfig {
    /// Forms relay access key
    pub access_key: String,
    /// Used to build the `subject` field
    pub form_name: String,
    pub allow_files: bool,
    pub max_file_size: u64,
    /// MIME types, `category/*` wildcards, `*/*`, or `.ext` extensions
    pub allowed_file_types: Vec<String>,
    pub max_files: usize,
    /// Cap on the combined size of one batch; unset means no cap
    pub max_total_size: Option<u64>,
    pub max_name_length: Option<usize>,
    pub reject_empty: bool,
    /// Payload key receiving the joined asset URLs
    pub media_field: String,
}

impl std::fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormConfig")
            .field("form_name", &self.form_name)
            .field("allow_files", &self.allow_files)
            .field("max_file_size", &self.max_file_size)
            .field("allowed_file_types", &self.allowed_file_types)
            .field("max_files", &self.max_files)
            .field("max_total_size", &self.max_total_size)
            .field("max_name_length", &self.max_name_length)
            .field("reject_empty", &self.reject_empty)
            .field("media_field", &self.media_field)
            .finish_non_exhaustive()
    }
}

impl FormConfig {
    pub fn new(access_key: impl Into<String>, form_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            form_name: form_name.into(),
            allow_files: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_files: MAX_FILES,
            max_total_size: None,
            max_name_length: None,
            reject_empty: true,
            media_field: DEFAULT_MEDIA_FIELD.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let access_key = env::var("VIGIL_ACCESS_KEY")
            .map_err(|_| anyhow::anyhow!("VIGIL_ACCESS_KEY must be set for form submission"))?;
        let form_name = env::var("VIGIL_FORM_NAME").unwrap_or_else(|_| "Report".to_string());

        let mut config = FormConfig::new(access_key, form_name);
        config.allow_files = env::var("VIGIL_ALLOW_FILES")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse()
            .unwrap_or(true);
        config.max_file_size = mb_to_bytes(
            "MAX_FILE_SIZE_MB",
            env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
                .parse::<u64>()
                .unwrap_or(MAX_FILE_SIZE_MB),
        )?;
        if let Ok(types) = env::var("VIGIL_ALLOWED_FILE_TYPES") {
            config.allowed_file_types = split_list(&types)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect();
        }
        config.max_files = env::var("VIGIL_MAX_FILES")
            .unwrap_or_else(|_| MAX_FILES.to_string())
            .parse()
            .unwrap_or(MAX_FILES);
        config.max_total_size = env::var("VIGIL_MAX_TOTAL_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|mb| mb_to_bytes("VIGIL_MAX_TOTAL_SIZE_MB", mb))
            .transpose()?;
        config.max_name_length = env::var("VIGIL_MAX_FILE_NAME_LENGTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n: &usize| n > 0);
        if let Ok(field) = env::var("VIGIL_MEDIA_FIELD") {
            if !field.trim().is_empty() {
                config.media_field = field.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.access_key.trim().is_empty() {
            return Err(anyhow::anyhow!("VIGIL_ACCESS_KEY must not be empty"));
        }

        if self.max_file_size == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.allow_files {
            if self.max_files == 0 {
                return Err(anyhow::anyhow!(
                    "VIGIL_MAX_FILES must be greater than zero when attachments are allowed"
                ));
            }
            if self.allowed_file_types.is_empty() {
                return Err(anyhow::anyhow!(
                    "VIGIL_ALLOWED_FILE_TYPES must list at least one type"
                ));
            }
        }

        if self.media_field.trim().is_empty() {
            return Err(anyhow::anyhow!("VIGIL_MEDIA_FIELD must not be empty"));
        }

        Ok(())
    }

    pub fn subject(&self) -> String {
        format!("New {} Submission", self.form_name)
    }

    /// File constraints derived from this form's attachment policy.
    pub fn constraints(&self) -> FileConstraints {
        FileConstraints {
            max_file_size: self.max_file_size,
            allowed_types: self.allowed_file_types.clone(),
            max_files: self.max_files,
            reject_empty: self.reject_empty,
            max_name_length: self.max_name_length,
            max_total_size: self.max_total_size,
        }
    }
}
