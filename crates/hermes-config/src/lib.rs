//! Typed configuration for Hermes.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`HermesConfig`] holds:
//!
//! - [`LoggingSection`] - log level and format, convertible to a
//!   [`LogConfig`](hermes_telemetry::LogConfig)
//! - [`BaggageSection`] - domain segments and prefix overrides, convertible to
//!   a [`Baggage`](hermes_baggage::Baggage)
//! - named eigenkey extractors
//! - named response mocker documents
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [baggage]
//! domains = ["x-tproxy", "user"]
//!
//! [extractors.login]
//! namespace = "tproxy"
//! key_post_func_names = ["md5"]
//! clean_path = true
//! request_extractor = { use_method = true, use_path = true, use_arguments = ["a"] }
//!
//! [mockers.login]
//! response_mocker = "ResponseMockerBuilder"
//! status_code = 200
//! body = "ok"
//! options = { latency = "3ms" }
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`, for example `HERMES__LOGGING__LEVEL=debug` or
//! `HERMES__BAGGAGE__DOMAINS=x-tproxy,user`.

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{HermesConfig, HermesConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BaggageSection, LoggingSection};
