//! # Hermes Baggage
//!
//! Namespaced string attributes that travel across a network boundary as HTTP
//! headers or query parameters, in the spirit of tracing baggage.
//!
//! A [`Baggage`] is scoped by a domain path such as `["x-tproxy", "user"]`,
//! which yields the header prefix `X-Tproxy-User-` and the parameter prefix
//! `x-tproxy-user-`. Attribute names are canonicalized on every path, so
//! `mozi_tid`, `mozi-tid` and `Mozi-Tid` denote the same attribute.
//!
//! ## Example
//!
//! ```rust
//! use hermes_baggage::Baggage;
//! use hermes_core::{Carrier, HttpCarrier};
//! use http::Method;
//!
//! let mut outgoing = Baggage::new(["x-tproxy", "user"]);
//! outgoing.set_attribute("user_name", "alice").set_attribute("uid", "2");
//!
//! let mut carrier = HttpCarrier::from_url(Method::GET, "/ws/jwks").unwrap();
//! outgoing.inject_headers(Some(&mut carrier));
//! assert_eq!(carrier.headers()["x-tproxy-user-user-name"], "alice");
//!
//! let mut incoming = Baggage::new(["x-tproxy", "user"]);
//! incoming.extract(Some(&mut carrier));
//! assert_eq!(incoming.attr("uid").int64().unwrap(), 2);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-baggage/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod baggage;
mod canonical;
mod value;

pub use baggage::Baggage;
pub use canonical::{canonical_header_key, canonical_key};
pub use value::{must, Value};
