//! # Hermes
//!
//! **Request baggage, eigenkeys and mock responses for the Themis Platform**
//!
//! Hermes bundles three request-scoped tools behind one registry:
//!
//! - **Baggage** – namespaced attributes propagated through headers and
//!   query/form parameters
//! - **Eigenkeys** – deterministic fingerprints of a configurable subset of a
//!   request, optionally digested
//! - **Mock responses** – strategies selected by JSON configuration, matched
//!   to requests by eigenkey
//!
//! ## Quick Start
//!
//! ```rust
//! use hermes::prelude::*;
//! use http::Method;
//!
//! let config = ConfigLoader::new()
//!     .with_string(
//!         r#"
//!         [baggage]
//!         domains = ["x-tproxy", "user"]
//!
//!         [extractors.login]
//!         key_post_func_names = ["md5"]
//!         request_extractor = { use_method = true, use_path = true }
//!         "#,
//!         "toml",
//!     )
//!     .unwrap()
//!     .load()
//!     .unwrap();
//! let hermes = Hermes::from_config(config).unwrap();
//!
//! let mut carrier = HttpCarrier::from_url(Method::GET, "/ws/xxxsdk/login").unwrap();
//!
//! let mut baggage = hermes.new_baggage();
//! baggage.set_attribute("user_name", "alice");
//! baggage.inject_headers(Some(&mut carrier));
//! assert_eq!(carrier.headers()["X-Tproxy-User-User-Name"], "alice");
//!
//! let key = hermes.extractor("login").unwrap().eigenkey(&mut carrier).unwrap();
//! assert_eq!(key.len(), 32);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HermesConfig ──▶ Hermes ──▶ TypeRegistry
//!                    │           ├─ dyn KeyGenerator      (default)
//!                    │           ├─ dyn KeyPostProcessor  (md5, sha1, sha256, prefix64)
//!                    │           ├─ EigenkeyExtractor     (http)
//!                    │           └─ dyn ResponseMocker    ("", ResponseMockerFromURL, ResponseMockerBuilder)
//!                    ├─ extractors: name → EigenkeyExtractor
//!                    └─ mockers:    name → dyn ResponseMocker
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod runtime;

pub use runtime::{default_registry, init, Hermes, InitError};

// Re-export core types
pub use hermes_core as core;

// Re-export baggage types
pub use hermes_baggage as baggage;

// Re-export eigenkey types
pub use hermes_eigenkey as eigenkey;

// Re-export mock types
pub use hermes_mock as mock;

// Re-export logging setup
pub use hermes_telemetry as telemetry;

// Re-export configuration types
pub use hermes_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{default_registry, init, Hermes, InitError};

    pub use hermes_core::{
        Carrier, ErrorCategory, HermesError, HermesResult, HttpCarrier, TypeRegistry,
    };

    // Re-export baggage types
    pub use hermes_baggage::{must, Baggage, Value};

    // Re-export eigenkey types
    pub use hermes_eigenkey::{EigenkeyExtractor, RequestFeatureSelection};

    // Re-export mock types
    pub use hermes_mock::{
        unmarshal_response_mocker, EigenkeyMatcher, Matcher, MockError, MockResult,
        ResponseMocker,
    };

    // Re-export configuration types
    pub use hermes_config::{ConfigLoader, HermesConfig};
}
