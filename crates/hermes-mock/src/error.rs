//! Error types for mock response production.

use hermes_core::HermesError;
use thiserror::Error;

/// Result type alias using [`MockError`].
pub type MockResult<T> = Result<T, MockError>;

/// Errors raised while resolving or running a response mocker.
#[derive(Debug, Error)]
pub enum MockError {
    /// Registry or configuration failure.
    #[error(transparent)]
    Hermes(#[from] HermesError),

    /// Fetching a response or body from a URL failed.
    #[error("Upstream error: {message} ({url})")]
    Upstream {
        /// The URL that was fetched.
        url: String,
        /// Error message.
        message: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The transparent mocker was asked to produce a response.
    #[error("transparent response mocker cannot produce a response; fetch the upstream instead")]
    Transparent,

    /// The configured response cannot be represented.
    #[error("Invalid mock response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl MockError {
    /// Create an upstream error.
    pub fn upstream(
        url: impl Into<String>,
        message: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Upstream {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    /// Get a stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Hermes(err) => err.error_code(),
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Transparent => "TRANSPARENT_MOCKER",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
        }
    }
}
