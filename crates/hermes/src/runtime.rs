//! The assembled Hermes runtime.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hermes_baggage::Baggage;
use hermes_config::{ConfigError, HermesConfig};
use hermes_core::{HermesError, HermesResult, TypeRegistry};
use hermes_eigenkey::EigenkeyExtractor;
use hermes_mock::{resolve_response_mocker, ResponseMocker};
use hermes_telemetry::{init_logging, TelemetryError};
use thiserror::Error;
use tracing::info;

/// Errors raised while starting Hermes.
#[derive(Debug, Error)]
pub enum InitError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// An extractor or mocker could not be resolved.
    #[error(transparent)]
    Hermes(#[from] HermesError),
}

/// Creates a registry with every built-in eigenkey and mock implementation.
///
/// # Errors
///
/// Returns an error only if a built-in registration fails.
pub fn default_registry() -> HermesResult<TypeRegistry> {
    let registry = TypeRegistry::new();
    hermes_eigenkey::register_defaults(&registry)?;
    hermes_mock::register_defaults(&registry)?;
    Ok(registry)
}

/// Initializes logging from `config.logging`, then builds the runtime.
///
/// # Errors
///
/// Returns [`InitError`] if logging cannot be installed or an extractor or
/// mocker cannot be resolved.
pub fn init(config: HermesConfig) -> Result<Hermes, InitError> {
    init_logging(&config.logging.to_log_config())?;
    Ok(Hermes::from_config(config)?)
}

/// Extractors and mockers resolved from a [`HermesConfig`].
///
/// # Example
///
/// ```rust
/// use hermes::Hermes;
/// use hermes::config::ConfigLoader;
/// use hermes::core::HttpCarrier;
/// use http::Method;
///
/// let config = ConfigLoader::new()
///     .with_string(
///         r#"
///         [extractors.login]
///         request_extractor = { use_method = true, use_path = true }
///         "#,
///         "toml",
///     )
///     .unwrap()
///     .load()
///     .unwrap();
///
/// let hermes = Hermes::from_config(config).unwrap();
/// let mut carrier = HttpCarrier::from_url(Method::POST, "/ws/x/jwks").unwrap();
/// let key = hermes.extractor("login").unwrap().eigenkey(&mut carrier).unwrap();
/// assert_eq!(key, "POST:/ws/x/jwks");
/// ```
pub struct Hermes {
    config: HermesConfig,
    registry: Arc<TypeRegistry>,
    extractors: BTreeMap<String, Arc<EigenkeyExtractor>>,
    mockers: BTreeMap<String, Arc<dyn ResponseMocker>>,
}

impl Hermes {
    /// Builds the runtime against [`default_registry`].
    ///
    /// # Errors
    ///
    /// Returns an error if an extractor cannot be provisioned or a mocker
    /// cannot be resolved.
    pub fn from_config(config: HermesConfig) -> HermesResult<Self> {
        Self::with_registry(config, Arc::new(default_registry()?))
    }

    /// Builds the runtime against a caller-supplied registry.
    ///
    /// # Errors
    ///
    /// Returns an error if an extractor cannot be provisioned or a mocker
    /// cannot be resolved.
    pub fn with_registry(config: HermesConfig, registry: Arc<TypeRegistry>) -> HermesResult<Self> {
        let mut extractors = BTreeMap::new();
        for (name, extractor) in &config.extractors {
            let mut extractor = extractor.clone();
            extractor.provision(&registry)?;
            extractors.insert(name.clone(), Arc::new(extractor));
        }

        let mut mockers = BTreeMap::new();
        for (name, raw) in &config.mockers {
            mockers.insert(name.clone(), resolve_response_mocker(&registry, raw)?);
        }

        info!(
            extractors = extractors.len(),
            mockers = mockers.len(),
            "Hermes runtime ready"
        );
        Ok(Self {
            config,
            registry,
            extractors,
            mockers,
        })
    }

    /// The registry extractors and mockers were resolved from.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The configuration the runtime was built from.
    pub fn config(&self) -> &HermesConfig {
        &self.config
    }

    /// Creates an empty baggage with the configured prefixes.
    #[must_use]
    pub fn new_baggage(&self) -> Baggage {
        self.config.baggage.to_baggage()
    }

    /// Returns the provisioned extractor named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] for an unconfigured name.
    pub fn extractor(&self, name: &str) -> HermesResult<Arc<EigenkeyExtractor>> {
        self.extractors
            .get(name)
            .cloned()
            .ok_or_else(|| HermesError::not_found("extractors", name))
    }

    /// Returns the mocker named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] for an unconfigured name.
    pub fn mocker(&self, name: &str) -> HermesResult<Arc<dyn ResponseMocker>> {
        self.mockers
            .get(name)
            .cloned()
            .ok_or_else(|| HermesError::not_found("mockers", name))
    }
}

impl fmt::Debug for Hermes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hermes")
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .field("mockers", &self.mockers.keys().collect::<Vec<_>>())
            .field("registry", &self.registry)
            .finish()
    }
}
