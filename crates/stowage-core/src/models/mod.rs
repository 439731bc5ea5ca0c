//! Data models for the ingestion pipeline

mod attachment;
mod upload;

pub use attachment::*;
pub use upload::*;
