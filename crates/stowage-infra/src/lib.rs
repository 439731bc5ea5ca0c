//! Stowage Infrastructure Library
//!
//! Process-level setup shared by Stowage binaries.

pub mod telemetry;

pub use telemetry::{init_telemetry, LogFormat};
