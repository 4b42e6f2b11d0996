//! Main configuration type.
//!
//! This module provides the top-level [`HermesConfig`] struct and its builder.

use std::collections::BTreeMap;

use hermes_eigenkey::EigenkeyExtractor;
use hermes_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

use crate::{BaggageSection, ConfigError, LoggingSection};

/// Complete Hermes configuration.
///
/// Extractors are keyed by name and hold the same JSON shape that
/// [`EigenkeyExtractor::from_json`] accepts. Mockers are kept as raw JSON
/// documents, resolved later by their `response_mocker` field.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.logging.level, "info");
/// assert!(config.extractors.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Baggage configuration.
    #[serde(default)]
    pub baggage: BaggageSection,

    /// Eigenkey extractors by name.
    #[serde(default)]
    pub extractors: BTreeMap<String, EigenkeyExtractor>,

    /// Response mocker configurations by name.
    #[serde(default)]
    pub mockers: BTreeMap<String, serde_json::Value>,
}

impl HermesConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HermesConfigBuilder {
        HermesConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is not a valid filter
    /// - A baggage domain segment is empty or contains whitespace
    /// - An extractor names an empty post-processor
    /// - A mocker entry is not a JSON object
    pub fn validate(&self) -> Result<(), ConfigError> {
        if hermes_telemetry::create_env_filter(&self.logging.level).is_err() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("invalid filter: {}", self.logging.level),
            ));
        }

        for (index, segment) in self.baggage.domains.iter().enumerate() {
            if segment.is_empty() || segment.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid_value(
                    format!("baggage.domains[{index}]"),
                    format!("segment must be non-empty and free of whitespace: {segment:?}"),
                ));
            }
        }

        for (name, extractor) in &self.extractors {
            if extractor.key_post_func_names.iter().any(String::is_empty) {
                return Err(ConfigError::invalid_value(
                    format!("extractors.{name}.key_post_func_names"),
                    "post-processor names must not be empty",
                ));
            }
        }

        for (name, mocker) in &self.mockers {
            if !mocker.is_object() {
                return Err(ConfigError::invalid_value(
                    format!("mockers.{name}"),
                    "must be a table/object",
                ));
            }
        }

        Ok(())
    }

    /// Create a development configuration preset: debug level, pretty output.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_config::HermesConfig;
    ///
    /// let config = HermesConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Create a production configuration preset: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`HermesConfig`].
#[derive(Debug, Default)]
pub struct HermesConfigBuilder {
    logging: Option<LoggingSection>,
    baggage: Option<BaggageSection>,
    extractors: BTreeMap<String, EigenkeyExtractor>,
    mockers: BTreeMap<String, serde_json::Value>,
}

impl HermesConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSection) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the baggage configuration.
    #[must_use]
    pub fn baggage(mut self, baggage: BaggageSection) -> Self {
        self.baggage = Some(baggage);
        self
    }

    /// Add a named extractor.
    #[must_use]
    pub fn extractor(mut self, name: impl Into<String>, extractor: EigenkeyExtractor) -> Self {
        self.extractors.insert(name.into(), extractor);
        self
    }

    /// Add a named mocker configuration.
    #[must_use]
    pub fn mocker(mut self, name: impl Into<String>, mocker: serde_json::Value) -> Self {
        self.mockers.insert(name.into(), mocker);
        self
    }

    /// Build the configuration. Unset sections use their default values.
    #[must_use]
    pub fn build(self) -> HermesConfig {
        HermesConfig {
            logging: self.logging.unwrap_or_default(),
            baggage: self.baggage.unwrap_or_default(),
            extractors: self.extractors,
            mockers: self.mockers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_valid() {
        assert!(HermesConfig::default().validate().is_ok());
        assert!(HermesConfig::development().validate().is_ok());
        assert!(HermesConfig::production().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HermesConfig::builder()
            .baggage(BaggageSection {
                domains: vec!["x-tproxy".to_string(), "user".to_string()],
                ..Default::default()
            })
            .extractor("login", EigenkeyExtractor::default())
            .mocker("ping", json!({"response_mocker": "ResponseMockerBuilder"}))
            .build();

        assert_eq!(config.baggage.domains, ["x-tproxy", "user"]);
        assert!(config.extractors.contains_key("login"));
        assert_eq!(config.mockers.len(), 1);
        assert_eq!(config.logging, LoggingSection::default());
    }

    #[test]
    fn test_validate_domains() {
        for bad in ["", "x proxy", "\t"] {
            let mut config = HermesConfig::default();
            config.baggage.domains = vec!["x".to_string(), bad.to_string()];
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("baggage.domains[1]"));
        }
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = HermesConfig::default();
        config.logging.level = "hermes_core=loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_post_processor_names() {
        let config = HermesConfig::builder()
            .extractor(
                "login",
                EigenkeyExtractor::default().with_post_processors(["md5", ""]),
            )
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extractors.login"));
    }

    #[test]
    fn test_validate_mocker_objects() {
        let config = HermesConfig::builder()
            .mocker("ping", json!("ResponseMockerBuilder"))
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mockers.ping"));
    }
}
