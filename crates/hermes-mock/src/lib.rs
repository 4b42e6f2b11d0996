//! # Hermes Mock
//!
//! Mock response strategies selected by configuration.
//!
//! A [`ResponseMocker`] is chosen by the `response_mocker` field of its JSON
//! configuration and resolved through a [`TypeRegistry`]:
//!
//! | `response_mocker` | Strategy |
//! |---|---|
//! | `""` or absent | [`TransparentResponseMocker`]: use the real upstream |
//! | `ResponseMockerFromURL` | fetch a whole response from `response_from_url` |
//! | `ResponseMockerBuilder` | `status_code`, `header`, `body` or `body_from_url` |
//!
//! Every strategy accepts `"options": {"latency": "3ms"}`.
//!
//! A [`Matcher`] maps a request to the mocker bound to its eigenkey.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hermes_core::{HttpCarrier, TypeRegistry};
//! use hermes_mock::{register_defaults, unmarshal_response_mocker};
//! use http::Method;
//!
//! # async fn run() -> Result<(), hermes_mock::MockError> {
//! let registry = TypeRegistry::new();
//! register_defaults(&registry)?;
//!
//! let mocker = unmarshal_response_mocker(
//!     &registry,
//!     r#"{"response_mocker": "ResponseMockerBuilder", "status_code": 200, "body": "pong"}"#,
//! )?;
//! let carrier = HttpCarrier::from_url(Method::GET, "/ping")?;
//! let response = mocker.mock(&carrier).await?;
//! assert_eq!(response.body(), "pong");
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-mock/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod matcher;
mod mocker;
mod options;
mod unmarshal;

pub use error::{MockError, MockResult};
pub use matcher::{EigenkeyMatcher, MatchOutcome, Matcher};
pub use mocker::{
    hydrate_as, ResponseMocker, ResponseMockerBuilder, ResponseMockerFromURL,
    TransparentResponseMocker,
};
pub use options::MockOptions;
pub use unmarshal::{resolve_response_mocker, unmarshal_response_mocker, RESPONSE_MOCKER_FIELD};

use hermes_core::{CapabilityId, HermesResult, TypeRegistry};
use hermes_eigenkey::EigenkeyExtractor;
use std::sync::Arc;

/// Declares the mock capabilities and registers the built-in strategies.
///
/// `dyn Matcher` is declared as depending on `dyn ResponseMocker` and
/// `EigenkeyExtractor`; the latter is registered by
/// [`hermes_eigenkey::register_defaults`].
pub fn register_defaults(registry: &TypeRegistry) -> HermesResult<()> {
    registry.register_type::<dyn ResponseMocker>();
    registry.register_type_with_dependencies::<dyn Matcher>(&[
        CapabilityId::of::<dyn ResponseMocker>(),
        CapabilityId::of::<EigenkeyExtractor>(),
    ]);

    registry.register::<dyn ResponseMocker>(
        TransparentResponseMocker::ID,
        Arc::new(TransparentResponseMocker::default()),
    )?;
    registry.register::<dyn ResponseMocker>(
        ResponseMockerFromURL::ID,
        Arc::new(ResponseMockerFromURL::default()),
    )?;
    registry.register::<dyn ResponseMocker>(
        ResponseMockerBuilder::ID,
        Arc::new(ResponseMockerBuilder::default()),
    )?;
    Ok(())
}
