use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use stowage_core::{AppError, ErrorMetadata, ErrorResponse, LogLevel, UploadFile};

/// Build an upload payload from a file on disk.
///
/// Without an explicit content type one is guessed from the extension.
pub fn upload_file_from_path(path: &Path, content_type: Option<String>) -> anyhow::Result<UploadFile> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no valid file name", path.display()))?
        .to_string();

    let content_type = content_type.or_else(|| {
        mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
    });

    Ok(UploadFile::from_path(filename, content_type, path))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Log a failed command at the error's level and build the body printed to stderr.
///
/// Sensitive details are left out when `production` is set.
pub fn report_error(err: &AppError, production: bool) -> ErrorResponse {
    let details = err.detailed_message();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code = err.error_code(), error = %details, "Command failed"),
        LogLevel::Warn => tracing::warn!(code = err.error_code(), error = %details, "Command failed"),
        LogLevel::Error => tracing::error!(code = err.error_code(), error = %details, "Command failed"),
    }
    err.to_response(production)
}
