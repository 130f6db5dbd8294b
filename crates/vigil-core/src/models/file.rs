use bytes::Bytes;
use std::path::Path;

/// A file picked by the user, before validation and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Display name, including the extension
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased extension without the leading dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Declared MIME type, lowercased and stripped of parameters.
    pub fn mime_essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}
