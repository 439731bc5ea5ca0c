//! Stowage CLI — store and delete attachments from the command line.
//!
//! Backends are configured through the environment (see `.env.example`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stowage_cli::{print_json, report_error, upload_file_from_path};
use stowage_core::{openapi_spec, AppError, AttachmentDto, AttachmentType, Config, OutputConverter};
use stowage_infra::{init_telemetry, LogFormat};
use stowage_storage::create_handlers;

#[derive(Parser)]
#[command(name = "stowage", about = "Stowage file storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Attachment type: local, s3 or minio (defaults to STORAGE_BACKEND)
        #[arg(long = "type")]
        attachment_type: Option<String>,
        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Delete a stored file by key
    Delete {
        /// Storage key returned by upload
        key: String,
        /// Attachment type that owns the key
        #[arg(long = "type")]
        attachment_type: String,
    },
    /// Print the OpenAPI document
    Openapi,
}

fn parse_type(value: &str) -> Result<AttachmentType, AppError> {
    value
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Unknown attachment type '{}'", value)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Openapi = cli.command {
        let json = openapi_spec()
            .to_pretty_json()
            .context("Serialize OpenAPI document")?;
        println!("{}", json);
        return Ok(());
    }

    let config = Config::from_env().context("Invalid configuration")?;
    init_telemetry(LogFormat::from_json_flag(config.log_json))?;
    tracing::debug!(
        environment = %config.environment,
        enabled = ?config.enabled_attachment_types(),
        "Configuration loaded"
    );

    if let Err(err) = run(cli.command, &config).await {
        let body = report_error(&err, config.is_production());
        eprintln!("{}", serde_json::to_string_pretty(&body)?);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> Result<(), AppError> {
    let handlers = create_handlers(config).await?;

    match command {
        Commands::Upload {
            file,
            attachment_type,
            content_type,
        } => {
            let attachment_type = match attachment_type {
                Some(value) => parse_type(&value)?,
                None => handlers.default_type(),
            };
            let payload = upload_file_from_path(&file, content_type)
                .map_err(|e| AppError::InvalidInput(format!("{:#}", e)))?;
            let result = handlers.upload_to(&payload, attachment_type).await?;
            print_json(&AttachmentDto::convert_from(&(result, attachment_type)))?;
        }
        Commands::Delete {
            key,
            attachment_type,
        } => {
            let attachment_type = parse_type(&attachment_type)?;
            handlers.delete(&key, attachment_type).await?;
            tracing::info!(key = %key, attachment_type = %attachment_type, "Deleted");
            print_json(&serde_json::json!({ "deleted": key, "type": attachment_type }))?;
        }
        Commands::Openapi => {}
    }

    Ok(())
}
