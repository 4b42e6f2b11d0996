//! Logging setup for Hermes.
//!
//! The Hermes libraries emit `tracing` events at the points where their
//! behaviour is otherwise silent:
//!
//! | Event | Level |
//! |-------|-------|
//! | capability declared, implementation registered | `debug` |
//! | implementation replaced under an existing name | `warn` |
//! | carrier error recorded on a baggage | `warn` |
//! | extractor provisioned, mocker resolved, request matched | `debug` |
//! | mock latency applied, mock URL fetched | `debug` |
//!
//! This crate installs a subscriber for them. It is optional; any other
//! `tracing` subscriber works just as well.
//!
//! # Example
//!
//! ```rust,no_run
//! use hermes_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     level: "info,hermes_core=debug".to_string(),
//!     format: LogFormat::Pretty,
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//! # Ok::<(), hermes_telemetry::TelemetryError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
