//! Stowage Storage Library
//!
//! File handlers for the supported attachment types and the dispatcher that
//! routes to them.
//!
//! # Storage key format
//!
//! All handlers use the same key layout:
//!
//! - **Files**: `upload/{yyyy}/{MM}/{stem}-{id}.{suffix}`
//! - **Thumbnails** (local handler): `upload/{yyyy}/{MM}/{stem}-{id}-thumbnail.{suffix}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all handlers stay consistent.

mod enrich;
pub mod factory;
pub mod keys;
pub mod local;
pub mod path;
pub mod registry;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_handlers;
pub use local::LocalFileHandler;
pub use path::{normalize_directory, FILE_SEPARATOR};
pub use registry::FileHandlers;
pub use s3::S3FileHandler;
pub use stowage_core::AttachmentType;
pub use stowage_processing::is_image_type;
pub use traits::{FileHandler, FileOperationError, FileResult};
