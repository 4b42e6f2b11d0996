//! The eigenkey extractor, wiring selection, generation and post-processing.

use crate::generator::KeyGenerator;
use crate::path::clean_path;
use crate::post::KeyPostProcessor;
use crate::selection::RequestFeatureSelection;
use crate::{DEFAULT_KEY_GENERATOR, HTTP_EXTRACTOR};
use hermes_core::{Carrier, HermesError, HermesResult, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Computes eigenkeys for requests.
///
/// Deserialized from JSON such as:
///
/// ```json
/// {
///     "namespace": "tproxy",
///     "key_func_name": "default",
///     "key_post_func_names": ["md5"],
///     "request_extractor": {"use_method": true, "use_path": true},
///     "clean_path": true
/// }
/// ```
///
/// and then [provisioned](Self::provision) against a registry, which resolves
/// the key generator and post-processors by name.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EigenkeyExtractor {
    /// Prefix scoping the generated keys.
    pub namespace: String,
    /// Key generator discriminator; empty selects `default`.
    pub key_func_name: String,
    /// Post-processor discriminators, applied in order.
    pub key_post_func_names: Vec<String>,
    /// Feature selection; absent means path only.
    pub request_extractor: Option<RequestFeatureSelection>,
    /// Clean the captured path before generating.
    pub clean_path: bool,

    #[serde(skip)]
    generator: Option<Arc<dyn KeyGenerator>>,
    #[serde(skip)]
    post_processors: Vec<Arc<dyn KeyPostProcessor>>,
}

impl EigenkeyExtractor {
    /// Creates an unprovisioned extractor using `selection`.
    #[must_use]
    pub fn with_selection(selection: RequestFeatureSelection) -> Self {
        Self {
            request_extractor: Some(selection),
            ..Self::default()
        }
    }

    /// Sets the namespace prefix.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the post-processor discriminators, applied in order.
    pub fn with_post_processors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_post_func_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Deserializes an extractor from JSON and provisions it.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Deserialization`] for malformed JSON, and any
    /// error from [`provision`](Self::provision).
    pub fn from_json(registry: &TypeRegistry, raw: &str) -> HermesResult<Self> {
        let mut extractor: Self = serde_json::from_str(raw)
            .map_err(|err| HermesError::deserialization(HTTP_EXTRACTOR, err))?;
        extractor.provision(registry)?;
        Ok(extractor)
    }

    /// Resolves the key generator and post-processors from `registry`.
    ///
    /// Provisioning again replaces previously resolved collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] if a declared dependency of the
    /// extractor has no registrations or a named collaborator is unknown.
    pub fn provision(&mut self, registry: &TypeRegistry) -> HermesResult<()> {
        registry.ensure_dependencies::<Self>()?;

        let key_func_name = if self.key_func_name.is_empty() {
            DEFAULT_KEY_GENERATOR
        } else {
            self.key_func_name.as_str()
        };
        let generator = registry.get::<dyn KeyGenerator>(key_func_name)?;
        let post_processors = self
            .key_post_func_names
            .iter()
            .map(|name| registry.get::<dyn KeyPostProcessor>(name))
            .collect::<HermesResult<Vec<_>>>()?;

        self.generator = Some(generator);
        self.post_processors = post_processors;
        if self.request_extractor.is_none() {
            self.request_extractor = Some(RequestFeatureSelection::path_only());
        }

        debug!(
            namespace = %self.namespace,
            key_func_name,
            post_processors = ?self.key_post_func_names,
            "Provisioned eigenkey extractor"
        );
        Ok(())
    }

    /// Returns `true` once [`provision`](Self::provision) has succeeded.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.generator.is_some()
    }

    /// Computes the eigenkey of `carrier`.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Configuration`] if the extractor is not
    /// provisioned.
    pub fn eigenkey(&self, carrier: &mut dyn Carrier) -> HermesResult<String> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            HermesError::configuration("eigenkey extractor is not provisioned")
        })?;

        let path_only;
        let selection = match &self.request_extractor {
            Some(selection) => selection,
            None => {
                path_only = RequestFeatureSelection::path_only();
                &path_only
            }
        };

        let mut snapshot = selection.extract(carrier);
        if self.clean_path && selection.use_path {
            snapshot.path = clean_path(&snapshot.path);
        }
        Ok(generator.generate(&self.namespace, &snapshot, &self.post_processors))
    }
}

impl fmt::Debug for EigenkeyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EigenkeyExtractor")
            .field("namespace", &self.namespace)
            .field("key_func_name", &self.key_func_name)
            .field("key_post_func_names", &self.key_post_func_names)
            .field("request_extractor", &self.request_extractor)
            .field("clean_path", &self.clean_path)
            .field("provisioned", &self.is_provisioned())
            .finish()
    }
}
