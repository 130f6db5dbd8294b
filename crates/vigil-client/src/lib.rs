//! HTTP collaborators and orchestration for Vigil report forms.
//!
//! The three remote services (signature endpoint, asset host, forms relay)
//! sit behind async traits so the orchestration core can be exercised with
//! in-memory doubles. `build_submitter` wires the reqwest implementations.

pub mod asset_host;
pub mod relay;
pub mod signature;
pub mod submitter;
pub mod uploader;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use vigil_core::{ClientConfig, FormConfig, SubmissionObserver};

pub use asset_host::{AssetHost, AssetHostError, HttpAssetHost, UploadOptions};
pub use relay::{FormRelay, HttpFormRelay, RelayError, RelayResponse};
pub use signature::{HttpSignatureSource, SignatureError, SignatureSource};
pub use submitter::{FormSubmitter, SubmissionReceipt, SubmitError};
pub use uploader::UploadOrchestrator;
pub use wizard::WizardSession;

/// Shared reqwest client with the configured request timeout.
pub fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("Failed to create HTTP client")
}

/// Upload orchestrator backed by the HTTP signature endpoint and asset host.
pub fn build_uploader(
    client: &Client,
    config: &ClientConfig,
    form: &FormConfig,
    observer: Arc<dyn SubmissionObserver>,
) -> UploadOrchestrator {
    let signatures = Arc::new(HttpSignatureSource::new(
        client.clone(),
        config.signature_url.clone(),
    ));
    let host = Arc::new(HttpAssetHost::new(
        client.clone(),
        config.upload_base_url.clone(),
    ));

    UploadOrchestrator::new(
        form.constraints(),
        signatures,
        host,
        UploadOptions::from_config(config),
    )
    .with_observer(observer)
}

/// Form submitter wired to every HTTP collaborator.
pub fn build_submitter(
    config: &ClientConfig,
    form: FormConfig,
    observer: Arc<dyn SubmissionObserver>,
) -> Result<FormSubmitter> {
    config.validate()?;
    form.validate()?;

    let client = build_http_client(config)?;
    let uploader = build_uploader(&client, config, &form, observer.clone());
    let relay = Arc::new(HttpFormRelay::new(client, config.relay_url.clone()));

    Ok(FormSubmitter::new(form, config.site_id.clone(), uploader, relay).with_observer(observer))
}
