//! Tracing initialization
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` driven by
//! `RUST_LOG` and a human-readable or JSON formatting layer.

mod init_basic;

pub use init_basic::{env_filter, init_telemetry, LogFormat, DEFAULT_FILTER};
