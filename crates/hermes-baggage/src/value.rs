//! Typed access to attribute values.

use hermes_core::{HermesError, HermesResult};
use std::fmt;

/// A baggage attribute value with lazy typed conversions.
///
/// Numeric conversions are fallible and name the attribute in their error.
/// [`bool`](Self::bool), [`bytes`](Self::bytes) and [`as_str`](Self::as_str)
/// never fail. Use [`must`] at call sites that prefer to abort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    name: String,
    raw: String,
}

impl Value {
    /// Creates a value for the attribute `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// Returns the canonical attribute name this value was read from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }

    /// Returns `true` if the attribute was absent or set to `""`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Parses the value as a platform-sized integer.
    pub fn int(&self) -> HermesResult<isize> {
        self.raw
            .parse()
            .map_err(|err| HermesError::parse(&self.name, &self.raw, "isize", err))
    }

    /// Parses the value as a 64-bit integer.
    pub fn int64(&self) -> HermesResult<i64> {
        self.raw
            .parse()
            .map_err(|err| HermesError::parse(&self.name, &self.raw, "i64", err))
    }

    /// Parses the value as a 64-bit float.
    pub fn float64(&self) -> HermesResult<f64> {
        self.raw
            .parse()
            .map_err(|err| HermesError::parse(&self.name, &self.raw, "f64", err))
    }

    /// Returns `false` only for `""`, `"false"` and `"False"`.
    #[must_use]
    pub fn bool(&self) -> bool {
        !matches!(self.raw.as_str(), "" | "false" | "False")
    }

    /// Consumes the value and returns the raw string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

/// Unwraps a conversion result, panicking with the error message on failure.
///
/// ```rust
/// use hermes_baggage::{must, Value};
///
/// let tid = Value::new("tid", "1");
/// assert_eq!(must(tid.int64()), 1);
/// ```
///
/// # Panics
///
/// Panics if `result` is an error.
pub fn must<T>(result: HermesResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
