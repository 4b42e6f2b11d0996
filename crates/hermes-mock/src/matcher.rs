//! Request matching.

use crate::mocker::ResponseMocker;
use crate::unmarshal::resolve_response_mocker;
use hermes_core::{Carrier, HermesError, HermesResult, TypeRegistry};
use hermes_eigenkey::EigenkeyExtractor;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The result of matching a request.
#[derive(Clone)]
pub struct MatchOutcome {
    /// The eigenkey computed for the request.
    pub eigenkey: String,
    /// The mocker bound to the eigenkey; `None` when nothing matched.
    pub mocker: Option<Arc<dyn ResponseMocker>>,
}

impl fmt::Debug for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchOutcome")
            .field("eigenkey", &self.eigenkey)
            .field("mocker", &self.mocker.as_ref().map(|m| m.id().to_string()))
            .finish()
    }
}

/// Selects the response mocker for a request.
///
/// A `None` mocker in the outcome means the request did not match and the
/// caller decides what to do.
pub trait Matcher: Send + Sync {
    /// Computes the eigenkey of `carrier` and looks up its mocker.
    ///
    /// # Errors
    ///
    /// Returns an error if the eigenkey cannot be computed.
    fn match_request(&self, carrier: &mut dyn Carrier) -> HermesResult<MatchOutcome>;

    /// Computes the eigenkey of `carrier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the eigenkey cannot be computed.
    fn eigenkey(&self, carrier: &mut dyn Carrier) -> HermesResult<String>;
}

/// Matches requests by eigenkey against a table of mockers.
///
/// Built from JSON such as:
///
/// ```json
/// {
///     "extractor": {"request_extractor": {"use_method": true, "use_path": true}},
///     "mockers": {
///         "GET:/ping": {"response_mocker": "ResponseMockerBuilder", "body": "pong"}
///     }
/// }
/// ```
#[derive(Default)]
pub struct EigenkeyMatcher {
    extractor: EigenkeyExtractor,
    mockers: HashMap<String, Arc<dyn ResponseMocker>>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EigenkeyMatcherConfig {
    extractor: EigenkeyExtractor,
    mockers: BTreeMap<String, serde_json::Value>,
}

impl EigenkeyMatcher {
    /// Creates a matcher with an empty table. `extractor` must be provisioned.
    #[must_use]
    pub fn new(extractor: EigenkeyExtractor) -> Self {
        Self {
            extractor,
            mockers: HashMap::new(),
        }
    }

    /// Deserializes a matcher, provisioning its extractor and resolving every
    /// mocker in its table.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Deserialization`] for malformed JSON, and any
    /// provisioning or mocker resolution error.
    pub fn from_json(registry: &TypeRegistry, raw: &str) -> HermesResult<Self> {
        let config: EigenkeyMatcherConfig = serde_json::from_str(raw)
            .map_err(|err| HermesError::deserialization("EigenkeyMatcher", err))?;
        registry.ensure_dependencies::<dyn Matcher>()?;

        let mut extractor = config.extractor;
        extractor.provision(registry)?;
        let mut matcher = Self::new(extractor);
        for (eigenkey, raw_mocker) in &config.mockers {
            let mocker = resolve_response_mocker(registry, raw_mocker)?;
            matcher.insert(eigenkey.clone(), mocker);
        }
        debug!(mockers = matcher.len(), "Built eigenkey matcher");
        Ok(matcher)
    }

    /// Binds `mocker` to `eigenkey`.
    #[must_use]
    pub fn with_mocker(
        mut self,
        eigenkey: impl Into<String>,
        mocker: Arc<dyn ResponseMocker>,
    ) -> Self {
        self.insert(eigenkey, mocker);
        self
    }

    /// Binds `mocker` to `eigenkey`, returning the previous binding.
    pub fn insert(
        &mut self,
        eigenkey: impl Into<String>,
        mocker: Arc<dyn ResponseMocker>,
    ) -> Option<Arc<dyn ResponseMocker>> {
        self.mockers.insert(eigenkey.into(), mocker)
    }

    /// Removes the binding for `eigenkey`.
    pub fn remove(&mut self, eigenkey: &str) -> Option<Arc<dyn ResponseMocker>> {
        self.mockers.remove(eigenkey)
    }

    /// The extractor computing eigenkeys.
    pub fn extractor(&self) -> &EigenkeyExtractor {
        &self.extractor
    }

    /// Number of bound eigenkeys.
    pub fn len(&self) -> usize {
        self.mockers.len()
    }

    /// Returns `true` if no eigenkey is bound.
    pub fn is_empty(&self) -> bool {
        self.mockers.is_empty()
    }
}

impl Matcher for EigenkeyMatcher {
    fn match_request(&self, carrier: &mut dyn Carrier) -> HermesResult<MatchOutcome> {
        let eigenkey = self.eigenkey(carrier)?;
        let mocker = self.mockers.get(&eigenkey).cloned();
        debug!(
            eigenkey = %eigenkey,
            matched = mocker.is_some(),
            "Matched request"
        );
        Ok(MatchOutcome { eigenkey, mocker })
    }

    fn eigenkey(&self, carrier: &mut dyn Carrier) -> HermesResult<String> {
        self.extractor.eigenkey(carrier)
    }
}

impl fmt::Debug for EigenkeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.mockers.keys().collect();
        keys.sort();
        f.debug_struct("EigenkeyMatcher")
            .field("extractor", &self.extractor)
            .field("eigenkeys", &keys)
            .finish()
    }
}
