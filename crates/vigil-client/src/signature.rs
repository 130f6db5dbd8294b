//! Upload signature endpoint client

use async_trait::async_trait;
use reqwest::Client;
use vigil_core::UploadSignature;

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Failed to reach signature endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Signature endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed signature response: {0}")]
    Malformed(String),
}

/// Source of short-lived upload authorizations.
///
/// Called once per upload batch. Implementations must not retry; the caller
/// decides whether to abandon the batch.
#[async_trait]
pub trait SignatureSource: Send + Sync {
    async fn fetch_signature(&self) -> Result<UploadSignature, SignatureError>;
}

/// Fetches signatures from the trusted same-origin endpoint with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpSignatureSource {
    client: Client,
    url: String,
}

impl HttpSignatureSource {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SignatureSource for HttpSignatureSource {
    async fn fetch_signature(&self) -> Result<UploadSignature, SignatureError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(SignatureError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SignatureError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(SignatureError::Transport)?;
        let signature: UploadSignature =
            serde_json::from_str(&body).map_err(|e| SignatureError::Malformed(e.to_string()))?;

        if signature.signature.is_empty() || signature.cloud_name.is_empty() {
            return Err(SignatureError::Malformed(
                "signature and cloudName must not be empty".to_string(),
            ));
        }

        tracing::debug!(
            cloud_name = %signature.cloud_name,
            timestamp = signature.timestamp,
            "Fetched upload signature"
        );
        Ok(signature)
    }
}
