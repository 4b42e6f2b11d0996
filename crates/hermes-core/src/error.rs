//! Error types for Hermes.
//!
//! This module provides the [`HermesError`] type, which is the standard error
//! type shared by the baggage, eigenkey and mock crates.
//!
//! | `ErrorCategory` | Raised when |
//! |---|---|
//! | `Configuration` | a collaborator is absent or a component is unprovisioned |
//! | `NotFound` | a capability, discriminator or dependency has no registration |
//! | `Parse` | a typed accessor cannot convert a raw value |
//! | `Deserialization` | a JSON configuration does not match its strategy |
//! | `InvalidHeader` | an attribute cannot be encoded as an HTTP header |
//!
//! On the baggage carrier paths `Configuration` and `InvalidHeader` errors are
//! recorded on the baggage rather than returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`HermesError`].
pub type HermesResult<T> = Result<T, HermesError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing collaborator or unprovisioned component.
    Configuration,
    /// Unknown capability, discriminator, or empty dependency.
    NotFound,
    /// Typed conversion of a raw string failed.
    Parse,
    /// JSON configuration did not match the selected strategy.
    Deserialization,
    /// A value could not be represented as an HTTP header.
    InvalidHeader,
}

/// Standard error type for Hermes.
///
/// # Example
///
/// ```
/// use hermes_core::{ErrorCategory, HermesError};
///
/// let err = HermesError::not_found("dyn KeyPostProcessor", "md4");
/// assert_eq!(err.category(), ErrorCategory::NotFound);
/// assert_eq!(err.error_code(), "NOT_FOUND");
/// assert!(err.to_string().contains("md4"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HermesError {
    /// A required collaborator is absent or a component was used unprovisioned.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// A registry lookup failed.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The capability type that was queried.
        capability: String,
        /// The discriminator that was queried, if the capability itself was found.
        discriminator: Option<String>,
    },

    /// A raw value could not be converted.
    #[error("Parse error: cannot convert {name} value '{value}' to {target}: {reason}")]
    Parse {
        /// The attribute (or input) name.
        name: String,
        /// The raw value that failed to convert.
        value: String,
        /// The requested target type.
        target: &'static str,
        /// The underlying conversion failure.
        reason: String,
    },

    /// A JSON configuration did not match the strategy it names.
    #[error("Deserialization error for '{discriminator}': {message}")]
    Deserialization {
        /// The discriminator selected from the configuration.
        discriminator: String,
        /// The underlying decoder message.
        message: String,
    },

    /// A header name or value could not be encoded.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// The header name that was being written.
        name: String,
        /// Human-readable error message.
        message: String,
    },
}

impl HermesError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a not found error for a capability that was never declared.
    #[must_use]
    pub fn capability_not_found(capability: impl Into<String>) -> Self {
        let capability = capability.into();
        Self::NotFound {
            message: format!("capability {capability} is not registered"),
            capability,
            discriminator: None,
        }
    }

    /// Creates a not found error for an unknown discriminator.
    #[must_use]
    pub fn not_found(capability: impl Into<String>, discriminator: impl Into<String>) -> Self {
        let capability = capability.into();
        let discriminator = discriminator.into();
        Self::NotFound {
            message: format!("no {capability} registered as '{discriminator}'"),
            capability,
            discriminator: Some(discriminator),
        }
    }

    /// Creates a not found error for a declared dependency with no registrations.
    #[must_use]
    pub fn dependency_not_found(
        capability: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let capability = capability.into();
        let dependency = dependency.into();
        Self::NotFound {
            message: format!("dependency {dependency} of {capability} has no registrations"),
            capability: dependency,
            discriminator: None,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(
        name: impl Into<String>,
        value: impl Into<String>,
        target: &'static str,
        reason: impl ToString,
    ) -> Self {
        Self::Parse {
            name: name.into(),
            value: value.into(),
            target,
            reason: reason.to_string(),
        }
    }

    /// Creates a deserialization error.
    #[must_use]
    pub fn deserialization(discriminator: impl Into<String>, message: impl ToString) -> Self {
        Self::Deserialization {
            discriminator: discriminator.into(),
            message: message.to_string(),
        }
    }

    /// Creates an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Deserialization { .. } => ErrorCategory::Deserialization,
            Self::InvalidHeader { .. } => ErrorCategory::InvalidHeader,
        }
    }

    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Deserialization { .. } => "DESERIALIZATION_ERROR",
            Self::InvalidHeader { .. } => "INVALID_HEADER",
        }
    }

    /// Returns structured details suitable for a log field or error payload.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound {
                capability,
                discriminator,
                ..
            } => Some(serde_json::json!({
                "capability": capability,
                "discriminator": discriminator,
            })),
            Self::Parse {
                name,
                value,
                target,
                ..
            } => Some(serde_json::json!({
                "name": name,
                "value": value,
                "target": target,
            })),
            Self::Deserialization { discriminator, .. } => Some(serde_json::json!({
                "discriminator": discriminator
            })),
            Self::InvalidHeader { name, .. } => Some(serde_json::json!({
                "name": name
            })),
            Self::Configuration { .. } => None,
        }
    }
}
