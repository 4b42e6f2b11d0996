//! Key generation.

use crate::post::KeyPostProcessor;
use crate::selection::RequestSnapshot;
use std::sync::Arc;

/// Turns a snapshot and a namespace into a key.
pub trait KeyGenerator: Send + Sync {
    /// Generates the key, then applies `post_processors` in order.
    fn generate(
        &self,
        namespace: &str,
        snapshot: &RequestSnapshot,
        post_processors: &[Arc<dyn KeyPostProcessor>],
    ) -> String;
}

/// Joins the non-empty parts remote address, namespace, method, URL, protocol
/// and header string with `:`.
///
/// ```rust
/// use hermes_eigenkey::{DefaultKeyGenerator, KeyGenerator, RequestSnapshot};
///
/// let snapshot = RequestSnapshot {
///     method: "POST".into(),
///     path: "/ws/x/jwks".into(),
///     ..RequestSnapshot::default()
/// };
/// assert_eq!(DefaultKeyGenerator.generate("", &snapshot, &[]), "POST:/ws/x/jwks");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyGenerator;

impl KeyGenerator for DefaultKeyGenerator {
    fn generate(
        &self,
        namespace: &str,
        snapshot: &RequestSnapshot,
        post_processors: &[Arc<dyn KeyPostProcessor>],
    ) -> String {
        let parts = [
            snapshot.remote_addr.clone(),
            namespace.to_string(),
            snapshot.method.clone(),
            snapshot.url(),
            snapshot.protocol.clone(),
            snapshot.header_string(),
        ];
        let key = parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(":");
        post_processors
            .iter()
            .fold(key, |key, processor| processor.process(&key))
    }
}
