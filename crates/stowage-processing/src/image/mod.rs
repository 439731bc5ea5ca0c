//! Image processing module
//!
//! - Dimension reading from the image header (reader)
//! - Thumbnail rendering (thumbnail)

pub mod reader;
pub mod thumbnail;

pub use reader::{read_dimensions, read_dimensions_from_bytes, MAX_DECODE_ALLOC_BYTES};
pub use thumbnail::render_thumbnail;
