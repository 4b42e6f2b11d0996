//! # Hermes Eigenkey
//!
//! Derives a deterministic fingerprint ("eigenkey") from a configurable,
//! ordered subset of a request.
//!
//! The pipeline has three pluggable stages, each resolved by name from a
//! [`TypeRegistry`](hermes_core::TypeRegistry):
//!
//! 1. [`RequestFeatureSelection`] captures the selected features of a
//!    [`Carrier`](hermes_core::Carrier) into a [`RequestSnapshot`].
//! 2. A [`KeyGenerator`] joins the snapshot and a namespace into one string.
//! 3. A chain of [`KeyPostProcessor`]s (digests, truncation) transforms it.
//!
//! [`EigenkeyExtractor`] wires the three together from JSON configuration.
//!
//! ## Example
//!
//! ```rust
//! use hermes_core::{HttpCarrier, TypeRegistry};
//! use hermes_eigenkey::{register_defaults, EigenkeyExtractor};
//! use http::Method;
//!
//! let registry = TypeRegistry::new();
//! register_defaults(&registry).unwrap();
//!
//! let extractor = EigenkeyExtractor::from_json(
//!     &registry,
//!     r#"{"request_extractor": {"use_method": true, "use_path": true}}"#,
//! )
//! .unwrap();
//!
//! let mut carrier = HttpCarrier::from_url(Method::POST, "/ws/x/jwks").unwrap();
//! assert_eq!(extractor.eigenkey(&mut carrier).unwrap(), "POST:/ws/x/jwks");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-eigenkey/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod extractor;
mod generator;
mod path;
mod post;
mod selection;

pub use extractor::EigenkeyExtractor;
pub use generator::{DefaultKeyGenerator, KeyGenerator};
pub use path::clean_path;
pub use post::{KeyPostProcessor, Md5Digest, Prefix, Sha1Digest, Sha256Digest};
pub use selection::{RequestFeatureSelection, RequestSnapshot};

use hermes_core::{CapabilityId, HermesResult, TypeRegistry};
use std::sync::Arc;

/// Discriminator of the [`DefaultKeyGenerator`].
pub const DEFAULT_KEY_GENERATOR: &str = "default";

/// Discriminator of the HTTP [`EigenkeyExtractor`] factory.
pub const HTTP_EXTRACTOR: &str = "http";

/// Declares the eigenkey capabilities and registers the built-in
/// implementations.
///
/// | Capability | Discriminators |
/// |---|---|
/// | `dyn KeyGenerator` | `default` |
/// | `dyn KeyPostProcessor` | `md5`, `sha1`, `sha256`, `prefix64` |
/// | `EigenkeyExtractor` (factory) | `http` |
///
/// `EigenkeyExtractor` is declared as depending on both other capabilities.
pub fn register_defaults(registry: &TypeRegistry) -> HermesResult<()> {
    registry.register_type::<dyn KeyPostProcessor>();
    registry.register_type::<dyn KeyGenerator>();
    registry.register_type_with_dependencies::<EigenkeyExtractor>(&[
        CapabilityId::of::<dyn KeyPostProcessor>(),
        CapabilityId::of::<dyn KeyGenerator>(),
    ]);

    registry.register::<dyn KeyGenerator>(DEFAULT_KEY_GENERATOR, Arc::new(DefaultKeyGenerator))?;
    registry.register::<dyn KeyPostProcessor>("md5", Arc::new(Md5Digest))?;
    registry.register::<dyn KeyPostProcessor>("sha1", Arc::new(Sha1Digest))?;
    registry.register::<dyn KeyPostProcessor>("sha256", Arc::new(Sha256Digest))?;
    registry.register::<dyn KeyPostProcessor>("prefix64", Arc::new(Prefix(64)))?;
    registry.register_factory::<EigenkeyExtractor, _>(HTTP_EXTRACTOR, EigenkeyExtractor::default)?;
    Ok(())
}
