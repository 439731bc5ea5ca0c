//! Header-only dimension reading.

use image::{ImageFormat, ImageReader, ImageResult, Limits};
use std::io::{BufRead, Cursor, Seek};

/// Upper bound on what a decoder may allocate while reading one image.
///
/// Exceeding it surfaces as `ImageError::Limits` instead of exhausting memory.
pub const MAX_DECODE_ALLOC_BYTES: u64 = 256 * 1024 * 1024;

/// Read pixel width and height from an image stream.
///
/// `suffix` selects the decoder when it names a known format; otherwise the
/// format is sniffed from the leading bytes. Only the header is decoded.
pub fn read_dimensions<R: BufRead + Seek>(reader: R, suffix: &str) -> ImageResult<(u32, u32)> {
    let mut reader = match ImageFormat::from_extension(suffix) {
        Some(format) => ImageReader::with_format(reader, format),
        None => ImageReader::new(reader).with_guessed_format()?,
    };

    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_DECODE_ALLOC_BYTES);
    reader.limits(limits);

    reader.into_dimensions()
}

/// [`read_dimensions`] over an in-memory buffer
pub fn read_dimensions_from_bytes(data: &[u8], suffix: &str) -> ImageResult<(u32, u32)> {
    read_dimensions(Cursor::new(data), suffix)
}
