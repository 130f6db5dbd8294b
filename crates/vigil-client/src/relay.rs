//! Forms relay client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use vigil_core::FormPayload;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to reach forms relay: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Forms relay returned an unreadable response (status {status})")]
    Malformed { status: u16 },
}

/// Relay verdict on a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Third-party service that forwards form payloads.
#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn submit(&self, payload: &FormPayload) -> Result<RelayResponse, RelayError>;
}

/// Posts payloads as JSON. The `success` flag in the body decides the
/// outcome, whatever the HTTP status.
#[derive(Debug, Clone)]
pub struct HttpFormRelay {
    client: Client,
    url: String,
}

impl HttpFormRelay {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn submit(&self, payload: &FormPayload) -> Result<RelayResponse, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(RelayError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(RelayError::Transport)?;

        serde_json::from_str::<RelayResponse>(&body).map_err(|e| {
            tracing::debug!(status = status.as_u16(), error = %e, "Unreadable relay response");
            RelayError::Malformed {
                status: status.as_u16(),
            }
        })
    }
}
