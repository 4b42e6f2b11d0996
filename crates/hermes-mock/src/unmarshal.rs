//! Resolution of response mockers from JSON configuration.

use crate::mocker::{ResponseMocker, TransparentResponseMocker};
use hermes_core::{HermesError, HermesResult, TypeRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Field naming the strategy in a mocker configuration.
pub const RESPONSE_MOCKER_FIELD: &str = "response_mocker";

/// Builds a response mocker from raw JSON.
///
/// Blank input yields a [`TransparentResponseMocker`]. Otherwise the
/// `response_mocker` field selects a template registered under
/// `dyn ResponseMocker`; an absent field selects the transparent strategy.
///
/// # Errors
///
/// - [`HermesError::Deserialization`] for malformed JSON, a non-object
///   document, a non-string discriminator, or fields that do not match the
///   selected strategy.
/// - [`HermesError::NotFound`] for an unregistered discriminator.
///
/// # Example
///
/// ```rust
/// use hermes_core::TypeRegistry;
/// use hermes_mock::{register_defaults, unmarshal_response_mocker};
///
/// let registry = TypeRegistry::new();
/// register_defaults(&registry).unwrap();
///
/// assert!(unmarshal_response_mocker(&registry, "  ").unwrap().is_transparent());
///
/// let mocker = unmarshal_response_mocker(
///     &registry,
///     r#"{"response_mocker": "ResponseMockerBuilder", "status_code": 200, "body": "ok"}"#,
/// )
/// .unwrap();
/// assert_eq!(mocker.id(), "ResponseMockerBuilder");
/// ```
pub fn unmarshal_response_mocker(
    registry: &TypeRegistry,
    raw: &str,
) -> HermesResult<Arc<dyn ResponseMocker>> {
    if raw.trim().is_empty() {
        return Ok(Arc::new(TransparentResponseMocker::default()));
    }
    let value: Value =
        serde_json::from_str(raw).map_err(|err| HermesError::deserialization("", err))?;
    resolve_response_mocker(registry, &value)
}

/// Builds a response mocker from an already parsed JSON document.
///
/// # Errors
///
/// Same as [`unmarshal_response_mocker`].
pub fn resolve_response_mocker(
    registry: &TypeRegistry,
    value: &Value,
) -> HermesResult<Arc<dyn ResponseMocker>> {
    let Some(fields) = value.as_object() else {
        return Err(HermesError::deserialization(
            "",
            format!("mocker configuration must be a JSON object, got {value}"),
        ));
    };
    let id = match fields.get(RESPONSE_MOCKER_FIELD) {
        None | Some(Value::Null) => TransparentResponseMocker::ID,
        Some(Value::String(id)) => id.as_str(),
        Some(other) => {
            return Err(HermesError::deserialization(
                "",
                format!("{RESPONSE_MOCKER_FIELD} must be a string, got {other}"),
            ))
        }
    };

    let template = registry.get::<dyn ResponseMocker>(id)?;
    let mocker = template.hydrate(value)?;
    debug!(response_mocker = id, "Resolved response mocker");
    Ok(mocker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_defaults;
    use hermes_core::ErrorCategory;
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        register_defaults(&registry).unwrap();
        registry
    }

    #[test]
    fn test_blank_is_transparent() {
        let registry = TypeRegistry::new();
        for raw in ["", "   ", "\n\t"] {
            assert!(unmarshal_response_mocker(&registry, raw).unwrap().is_transparent());
        }
    }

    #[test]
    fn test_absent_discriminator_is_transparent() {
        let mocker = unmarshal_response_mocker(&registry(), r#"{"options": {"latency": "1ms"}}"#)
            .unwrap();
        assert!(mocker.is_transparent());
        assert_eq!(mocker.options().latency.as_millis(), 1);
    }

    #[test]
    fn test_unknown_discriminator() {
        let err = unmarshal_response_mocker(&registry(), r#"{"response_mocker": "Nope"}"#)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn test_undeclared_capability() {
        let err = unmarshal_response_mocker(
            &TypeRegistry::new(),
            r#"{"response_mocker": "ResponseMockerBuilder"}"#,
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_malformed_json() {
        let err = unmarshal_response_mocker(&registry(), "{").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Deserialization);

        let err = unmarshal_response_mocker(&registry(), "[1, 2]").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Deserialization);

        let err = unmarshal_response_mocker(&registry(), r#"{"response_mocker": 3}"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Deserialization);
    }

    #[test]
    fn test_structural_mismatch() {
        let err = unmarshal_response_mocker(
            &registry(),
            r#"{"response_mocker": "ResponseMockerBuilder", "status_code": "ok"}"#,
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Deserialization);
        assert!(err.to_string().contains("ResponseMockerBuilder"));
    }

    #[test]
    fn test_templates_are_not_mutated() {
        let registry = registry();
        resolve_response_mocker(
            &registry,
            &json!({"response_mocker": "ResponseMockerFromURL", "response_from_url": "http://a"}),
        )
        .unwrap();
        let fresh = resolve_response_mocker(
            &registry,
            &json!({"response_mocker": "ResponseMockerFromURL"}),
        )
        .unwrap();
        assert!(format!("{fresh:?}").contains("response_from_url: \"\""));
    }
}
