//! Media processing for stored uploads
//!
//! Dimension reading, thumbnail rendering and the metadata step every file
//! handler runs after a successful store.

pub mod image;
pub mod metadata;

pub use self::image::{read_dimensions, read_dimensions_from_bytes, render_thumbnail};
pub use metadata::{handle_image_metadata, is_image_type, MetadataOutcome, ThumbnailSupplier};
