//! Core module - configuration, errors and logging
//!
//! - [`ClientConfig`] - service URL, probe interval, request timeout
//! - [`ConfigError`] - configuration failures
//! - [`init_tracing`] - tracing subscriber for the binary

pub mod config;
pub mod error;
pub mod logging;

pub use config::{settings_path, ClientConfig};
pub use error::{ConfigError, ConfigResult};
pub use logging::init_tracing;
