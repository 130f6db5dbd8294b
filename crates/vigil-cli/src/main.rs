//! Vigil CLI: validate, upload and submit report evidence from the shell.
//!
//! Endpoints and form settings come from VIGIL_* environment variables
//! (a `.env` file is honored). Results are printed as JSON on stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use vigil_cli::{fields_from_pairs, init_tracing, load_files, parse_field};
use vigil_client::{build_http_client, build_submitter, build_uploader};
use vigil_core::{
    ClientConfig, ErrorMetadata, FileConstraints, FileValidator, FormConfig, RejectedFile,
    TracingObserver,
};

#[derive(Parser)]
#[command(name = "vigil", about = "Vigil report submission CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files against the form's attachment rules without uploading
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Number of files already attached
        #[arg(long, default_value = "0")]
        already_selected: usize,
    },
    /// Upload evidence files and print their asset URLs
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Submit a form, uploading any attached files first
    Submit {
        /// Form field as key=value; repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// File to attach; repeatable
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    valid: Vec<&'a str>,
    invalid: &'a [RejectedFile],
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            files,
            already_selected,
        } => {
            let constraints = match FormConfig::from_env() {
                Ok(form) => form.constraints(),
                Err(e) => {
                    tracing::debug!(error = %e, "No form configuration, using default file rules");
                    FileConstraints::default()
                }
            };
            let files = load_files(&files).await?;
            let report = FileValidator::new(constraints).validate_all(files, already_selected);

            print_json(&ValidationOutput {
                valid: report.valid_files.iter().map(|f| f.name.as_str()).collect(),
                invalid: &report.invalid_files,
            })?;
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Commands::Upload { files } => {
            let config = ClientConfig::from_env().context("Invalid client configuration")?;
            let form = FormConfig::from_env().context("Invalid form configuration")?;
            let client = build_http_client(&config)?;
            let uploader = build_uploader(&client, &config, &form, Arc::new(TracingObserver));

            let files = load_files(&files).await?;
            let batch = uploader.upload_all(files, 0).await;

            print_json(&serde_json::json!({
                "status": batch.status(),
                "urls": batch.urls(),
                "batch": batch,
            }))?;
            if batch.uploaded.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Submit { fields, files } => {
            let config = ClientConfig::from_env().context("Invalid client configuration")?;
            let form = FormConfig::from_env().context("Invalid form configuration")?;
            let submitter = build_submitter(&config, form, Arc::new(TracingObserver))?;

            let fields = fields_from_pairs(fields);
            let files = load_files(&files).await?;

            match submitter.try_submit(&fields, files).await {
                Ok(receipt) => print_json(&serde_json::json!({
                    "success": true,
                    "message": receipt.relay_message,
                    "batch": receipt.batch,
                }))?,
                Err(e) => {
                    print_json(&serde_json::json!({
                        "success": false,
                        "code": e.error_code(),
                        "message": e.client_message(),
                    }))?;
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
