use anyhow::{Context, Result};
use std::path::Path;
use vigil_core::validation::content_type_for_name;
use vigil_core::{CandidateFile, FormFields};

/// Read a file from disk, inferring its declared type from the extension.
pub async fn load_file(path: &Path) -> Result<CandidateFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();
    let content_type = content_type_for_name(&name);
    Ok(CandidateFile::new(name, content_type, data))
}

pub async fn load_files(paths: &[std::path::PathBuf]) -> Result<Vec<CandidateFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(path).await?);
    }
    Ok(files)
}

/// Parse a `key=value` form field argument.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field name missing in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn fields_from_pairs(pairs: Vec<(String, String)>) -> FormFields {
    let mut fields = FormFields::new();
    for (key, value) in pairs {
        fields.set(&key, value);
    }
    fields
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("message=a=b"),
            Ok(("message".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_field("name="),
            Ok(("name".to_string(), String::new()))
        );
    }

    #[test]
    fn parse_field_rejects_bad_input() {
        assert!(parse_field("no-separator").is_err());
        assert!(parse_field(" =value").is_err());
    }

    #[test]
    fn fields_route_known_keys() {
        let fields = fields_from_pairs(vec![
            ("name".to_string(), "Jane".to_string()),
            ("scam_type".to_string(), "phishing".to_string()),
        ]);
        assert_eq!(fields.name.as_deref(), Some("Jane"));
        assert_eq!(
            fields.extra.get("scam_type").map(String::as_str),
            Some("phishing")
        );
    }

    #[tokio::test]
    async fn load_file_infers_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Receipt.PDF");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let candidate = load_file(&path).await.unwrap();
        assert_eq!(candidate.name, "Receipt.PDF");
        assert_eq!(candidate.content_type, "application/pdf");
        assert_eq!(candidate.size(), 8);
    }

    #[tokio::test]
    async fn load_file_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.xyz");
        std::fs::write(&path, b"data").unwrap();

        let candidate = load_file(&path).await.unwrap();
        assert_eq!(candidate.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn load_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("gone.png")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
