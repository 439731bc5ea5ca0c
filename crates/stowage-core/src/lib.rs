//! Stowage Core Library
//!
//! This crate provides the domain types, error types, configuration, validation
//! helpers and API documentation model shared by all Stowage components.

pub mod api_doc;
pub mod config;
pub mod converter;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use api_doc::{openapi_spec, ApiDoc};
pub use config::Config;
pub use converter::OutputConverter;
pub use error::{AppError, ErrorMetadata, ErrorResponse, LogLevel};
pub use models::{AttachmentDto, FileBody, PayloadRead, UploadFile, UploadResult};
pub use storage_types::AttachmentType;
pub use validation::{ConstraintViolation, ConstraintViolations};
