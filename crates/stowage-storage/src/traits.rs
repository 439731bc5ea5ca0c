//! File handler abstraction
//!
//! Every storage backend implements [`FileHandler`]. Handlers persist the
//! payload, build an [`UploadResult`] and then run the shared image metadata
//! step from `stowage-processing` themselves.

use async_trait::async_trait;
use stowage_core::{AppError, AttachmentType, ConstraintViolations, UploadFile, UploadResult};
use thiserror::Error;

/// File operation errors
#[derive(Debug, Error)]
pub enum FileOperationError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ConstraintViolations),

    #[error("No file handler registered for attachment type {0}")]
    UnsupportedAttachmentType(AttachmentType),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileOperationError>;

impl From<FileOperationError> for AppError {
    fn from(err: FileOperationError) -> Self {
        match err {
            FileOperationError::NotFound(key) => AppError::NotFound(key),
            FileOperationError::InvalidKey(msg) => {
                AppError::InvalidInput(format!("Invalid storage key: {}", msg))
            }
            FileOperationError::InvalidPayload(violations) => AppError::from(violations),
            FileOperationError::UnsupportedAttachmentType(ty) => {
                AppError::UnsupportedAttachmentType(ty.to_string())
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage-specific upload handler.
///
/// Implementations are shared across tasks, so they must be `Send + Sync`
/// and keep no per-call state.
#[async_trait]
pub trait FileHandler: Send + Sync {
    /// Persist the payload and return the normalized result.
    ///
    /// Image payloads come back with width, height and a thumbnail path
    /// when their header can be decoded. The thumbnail path is never blank.
    async fn upload(&self, file: &UploadFile) -> FileResult<UploadResult>;

    /// Remove a stored file by the key returned from [`FileHandler::upload`].
    ///
    /// Whether a missing key is an error is up to the backend; the built-in
    /// handlers treat it as a no-op.
    async fn delete(&self, key: &str) -> FileResult<()>;

    /// The attachment type this handler stores
    fn attachment_type(&self) -> AttachmentType;
}
