//! # Hermes Core
//!
//! Core types shared by every Hermes crate.
//!
//! This crate provides the foundations the baggage, eigenkey and mock crates
//! are built on:
//!
//! - [`HermesError`] - Standard error type with [`ErrorCategory`] classification
//! - [`TypeRegistry`] - Capability/discriminator keyed registry of shared
//!   instances and factories, with declared dependency edges
//! - [`Carrier`] - The request surface baggage and eigenkeys read and write
//! - [`HttpCarrier`] - The provided [`Carrier`] implementation
//! - [`FormValues`] - Ordered multi-valued form/query map
//!
//! ## Example
//!
//! ```rust
//! use hermes_core::{Carrier, HttpCarrier};
//! use http::Method;
//!
//! let mut carrier = HttpCarrier::builder()
//!     .method(Method::POST)
//!     .url("/ws/login?a=1&a=2")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(carrier.path(), "/ws/login");
//! assert_eq!(carrier.form().get_all("a"), ["1", "2"]);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod carrier;
mod error;
mod form;
pub mod registry;

pub use carrier::{Carrier, HttpCarrier, HttpCarrierBuilder};
pub use error::{ErrorCategory, HermesError, HermesResult};
pub use form::FormValues;
pub use registry::{CapabilityId, TypeRegistry};
