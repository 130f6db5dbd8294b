//! Asset host upload client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use vigil_core::{CandidateFile, ClientConfig, UploadSignature, UploadedAsset};

#[derive(Debug, thiserror::Error)]
pub enum AssetHostError {
    /// The host answered with an error message
    #[error("{0}")]
    Rejected(String),

    #[error("Upload request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected upload response (status {status})")]
    UnexpectedResponse { status: u16 },
}

/// Fixed organizational metadata attached to every upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    /// Comma-joined tag list
    pub tags: String,
}

impl UploadOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            folder: config.upload_folder.clone(),
            tags: config.tags_param(),
        }
    }
}

/// Remote store for evidence files.
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// Upload one file using a signature shared by the whole batch.
    async fn upload(
        &self,
        file: &CandidateFile,
        signature: &UploadSignature,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, AssetHostError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Signed multipart uploads to `{base_url}/{cloud_name}/auto/upload`.
#[derive(Debug, Clone)]
pub struct HttpAssetHost {
    client: Client,
    base_url: String,
}

impl HttpAssetHost {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn upload_url(&self, cloud_name: &str) -> String {
        format!("{}/{}/auto/upload", self.base_url, cloud_name)
    }

    fn file_part(file: &CandidateFile) -> Part {
        let part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
        match part.mime_str(&file.content_type) {
            Ok(part) => part,
            Err(_) => Part::bytes(file.data.to_vec()).file_name(file.name.clone()),
        }
    }
}

#[async_trait]
impl AssetHost for HttpAssetHost {
    async fn upload(
        &self,
        file: &CandidateFile,
        signature: &UploadSignature,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, AssetHostError> {
        let form = Form::new()
            .part("file", Self::file_part(file))
            .text("upload_preset", signature.upload_preset.clone())
            .text("api_key", signature.api_key.clone())
            .text("timestamp", signature.timestamp.to_string())
            .text("signature", signature.signature.clone())
            .text("folder", options.folder.clone())
            .text("tags", options.tags.clone());

        let response = self
            .client
            .post(self.upload_url(&signature.cloud_name))
            .multipart(form)
            .send()
            .await
            .map_err(AssetHostError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AssetHostError::Transport)?;

        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(UploadResponse {
                secure_url: Some(url),
                ..
            }) => Ok(UploadedAsset {
                file_name: file.name.clone(),
                secure_url: url,
            }),
            Ok(UploadResponse {
                error: Some(error), ..
            }) => Err(AssetHostError::Rejected(error.message)),
            _ if !status.is_success() => Err(AssetHostError::Rejected(format!(
                "Upload failed with status {}",
                status.as_u16()
            ))),
            _ => Err(AssetHostError::UnexpectedResponse {
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{candidate, signature};
    use mockito::Matcher;

    fn options() -> UploadOptions {
        UploadOptions {
            folder: "scam-reports".to_string(),
            tags: "scam-report,user-evidence".to_string(),
        }
    }

    #[test]
    fn upload_url_uses_cloud_name() {
        let host = HttpAssetHost::new(Client::new(), "https://host.example/v1_1/".to_string());
        assert_eq!(
            host.upload_url("demo"),
            "https://host.example/v1_1/demo/auto/upload"
        );
    }

    #[test]
    fn options_from_config() {
        let options = UploadOptions::from_config(&ClientConfig::default());
        assert_eq!(options, self::options());
    }

    #[tokio::test]
    async fn returns_secure_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/auto/upload")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="upload_preset""#.to_string()),
                Matcher::Regex(r#"name="signature""#.to_string()),
                Matcher::Regex(r#"name="timestamp""#.to_string()),
                Matcher::Regex(r#"name="folder""#.to_string()),
                Matcher::Regex("scam-reports".to_string()),
                Matcher::Regex(r#"filename="shot.png""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"secure_url":"https://cdn.example/shot.png","public_id":"x"}"#)
            .expect(1)
            .create_async()
            .await;

        let host = HttpAssetHost::new(Client::new(), server.url());
        let asset = host
            .upload(&candidate("shot.png", "image/png", 16), &signature(), &options())
            .await
            .unwrap();

        assert_eq!(asset.secure_url, "https://cdn.example/shot.png");
        assert_eq!(asset.file_name, "shot.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn extracts_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/auto/upload")
            .with_status(400)
            .with_body(r#"{"error":{"message":"Stale request - reported time is too old"}}"#)
            .create_async()
            .await;

        let host = HttpAssetHost::new(Client::new(), server.url());
        let err = host
            .upload(&candidate("shot.png", "image/png", 16), &signature(), &options())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Stale request - reported time is too old");
    }

    #[tokio::test]
    async fn non_json_failure_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/auto/upload")
            .with_status(502)
            .with_body("<html>Bad gateway</html>")
            .create_async()
            .await;

        let host = HttpAssetHost::new(Client::new(), server.url());
        let err = host
            .upload(&candidate("shot.png", "image/png", 16), &signature(), &options())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Upload failed with status 502");
    }

    #[tokio::test]
    async fn success_without_url_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/auto/upload")
            .with_status(200)
            .with_body(r#"{"public_id":"x"}"#)
            .create_async()
            .await;

        let host = HttpAssetHost::new(Client::new(), server.url());
        let err = host
            .upload(&candidate("shot.png", "image/png", 16), &signature(), &options())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AssetHostError::UnexpectedResponse { status: 200 }
        ));
    }
}
