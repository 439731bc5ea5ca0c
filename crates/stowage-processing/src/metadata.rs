//! Image metadata extraction for stored uploads.
//!
//! Runs after a handler has persisted the payload and built its
//! [`UploadResult`]. Image payloads get their dimensions recorded and, when a
//! thumbnail supplier is given, a thumbnail path. Failures here never fail
//! the upload: they are logged and the result keeps its defaults.

use mime_guess::mime::{self, Mime};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use stowage_core::{UploadFile, UploadResult};
use thiserror::Error;

use crate::image::read_dimensions;

/// Deferred thumbnail producer, returning the thumbnail path.
///
/// Only invoked once the image header has been decoded.
pub type ThumbnailSupplier<'a> = Box<dyn FnOnce() -> String + Send + 'a>;

/// What happened while handling metadata for one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// The declared media type is missing or not `image/*`
    NotImage,
    Extracted { width: u32, height: u32 },
    /// Declared as an image but the header could not be read
    Undecodable,
}

#[derive(Debug, Error)]
enum MetadataError {
    #[error("failed to open payload: {0}")]
    Io(#[from] io::Error),
    #[error("failed to decode image header: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image decoder panicked: {0}")]
    Panic(String),
}

/// Whether the declared media type is an image type (`image/*`).
///
/// Only the declared type is trusted; the content is not sniffed here.
pub fn is_image_type(file: &UploadFile) -> bool {
    file.content_type()
        .and_then(|ct| ct.trim().to_ascii_lowercase().parse::<Mime>().ok())
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

/// Enrich `result` with image dimensions and a thumbnail path.
///
/// The payload is read through a reader scoped to this call. `result.suffix`
/// is the decoder hint. Whatever the outcome, a blank thumbnail path is
/// replaced by `result.file_path`.
pub fn handle_image_metadata(
    file: &UploadFile,
    result: &mut UploadResult,
    thumbnail: Option<ThumbnailSupplier<'_>>,
) -> MetadataOutcome {
    let outcome = if is_image_type(file) {
        let decoded = panic::catch_unwind(AssertUnwindSafe(|| {
            payload_dimensions(file, &result.suffix)
        }))
        .unwrap_or_else(|payload| Err(MetadataError::Panic(panic_message(&*payload))));

        match decoded {
            Ok((width, height)) => {
                result.width = Some(width);
                result.height = Some(height);
                if let Some(supplier) = thumbnail {
                    match panic::catch_unwind(AssertUnwindSafe(supplier)) {
                        Ok(path) => result.thumb_path = Some(path),
                        Err(payload) => tracing::warn!(
                            error = %panic_message(&*payload),
                            filename = %file.filename,
                            "Thumbnail generation panicked"
                        ),
                    }
                }
                MetadataOutcome::Extracted { width, height }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    filename = %file.filename,
                    suffix = %result.suffix,
                    "Failed to read image metadata"
                );
                MetadataOutcome::Undecodable
            }
        }
    } else {
        MetadataOutcome::NotImage
    };

    if result.thumb_path_is_blank() {
        result.thumb_path = Some(result.file_path.clone());
    }

    outcome
}

fn payload_dimensions(file: &UploadFile, suffix: &str) -> Result<(u32, u32), MetadataError> {
    let reader = file.open()?;
    Ok(read_dimensions(reader, suffix)?)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
