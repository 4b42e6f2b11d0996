//! The baggage container.

use crate::canonical::{canonical_header_key, canonical_key};
use crate::value::Value;
use hermes_core::{Carrier, HermesError};
use http::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use tracing::warn;

/// Namespaced string attributes plus the prefixes scoping them on the wire.
///
/// Carrier operations never fail: an absent carrier or an attribute that
/// cannot be written is recorded in [`errors`](Self::errors) and logged.
///
/// Prefix overrides ([`with_header_prefix`](Self::with_header_prefix),
/// [`with_param_prefix`](Self::with_param_prefix)) are meant for construction
/// time. Changing a prefix after extraction leaves attributes that were read
/// under the old prefix in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baggage {
    attributes: BTreeMap<String, String>,
    header_prefix: String,
    param_prefix: String,
    errors: Vec<HermesError>,
}

impl Baggage {
    /// Creates a baggage scoped by `domains`.
    ///
    /// ```rust
    /// use hermes_baggage::Baggage;
    ///
    /// let baggage = Baggage::new(["x-tprOxy", "user"]);
    /// assert_eq!(baggage.header_prefix(), "X-Tproxy-User-");
    /// assert_eq!(baggage.param_prefix(), "x-tproxy-user-");
    /// ```
    #[must_use]
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefix = domains
            .into_iter()
            .map(|segment| segment.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("-");
        prefix.push('-');
        Self {
            header_prefix: canonical_header_key(&prefix),
            param_prefix: canonical_key(&prefix),
            ..Self::default()
        }
    }

    /// Overrides the header prefix.
    #[must_use]
    pub fn with_header_prefix(mut self, prefix: &str) -> Self {
        self.header_prefix = canonical_header_key(prefix);
        self
    }

    /// Overrides the parameter prefix.
    #[must_use]
    pub fn with_param_prefix(mut self, prefix: &str) -> Self {
        self.param_prefix = canonical_key(prefix);
        self
    }

    /// Sets one attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Returns the header prefix, e.g. `X-Tproxy-User-`.
    #[must_use]
    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    /// Returns the parameter prefix, e.g. `x-tproxy-user-`.
    #[must_use]
    pub fn param_prefix(&self) -> &str {
        &self.param_prefix
    }

    /// Returns the attributes keyed by canonical name.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns the errors recorded by carrier operations.
    #[must_use]
    pub fn errors(&self) -> &[HermesError] {
        &self.errors
    }

    /// Removes and returns the recorded errors.
    pub fn take_errors(&mut self) -> Vec<HermesError> {
        std::mem::take(&mut self.errors)
    }

    /// Stores `value` under the canonical form of `name`. Last write wins.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(canonical_key(name), value.into());
        self
    }

    /// Merges `attributes` into the current set. Last write wins.
    pub fn merge_attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in attributes {
            self.set_attribute(name.as_ref(), value);
        }
        self
    }

    /// Discards all attributes when `attributes` is empty, otherwise merges.
    ///
    /// A non-empty input does not remove attributes it does not mention.
    pub fn replace_attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attributes = attributes.into_iter().peekable();
        if attributes.peek().is_none() {
            self.attributes.clear();
            return self;
        }
        self.merge_attributes(attributes)
    }

    /// Applies a preset, e.g. a set of domain-specific default attributes.
    pub fn apply<F>(&mut self, option: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        option(self);
        self
    }

    /// Records an error and logs it.
    pub fn record_error(&mut self, error: HermesError) -> &mut Self {
        warn!(
            code = error.error_code(),
            prefix = %self.param_prefix,
            error = %error,
            "Baggage error recorded"
        );
        self.errors.push(error);
        self
    }

    /// Returns the typed value of `name`, empty if absent.
    #[must_use]
    pub fn attr(&self, name: &str) -> Value {
        let name = canonical_key(name);
        let raw = self.attributes.get(&name).cloned().unwrap_or_default();
        Value::new(name, raw)
    }

    /// Returns the header representation: canonical header name to value.
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .map(|(name, value)| {
                let header = canonical_header_key(&format!("{}{name}", self.header_prefix));
                (header, value.clone())
            })
            .collect()
    }

    /// Returns the parameter representation: canonical parameter name to value.
    #[must_use]
    pub fn params(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .map(|(name, value)| {
                let param = canonical_key(&format!("{}{name}", self.param_prefix));
                (param, value.clone())
            })
            .collect()
    }

    /// Sets one header per attribute on `carrier`, replacing existing values.
    ///
    /// Attributes that cannot be encoded as a header are skipped and recorded.
    pub fn inject_headers(&mut self, carrier: Option<&mut dyn Carrier>) -> &mut Self {
        let Some(carrier) = carrier else {
            return self.record_error(HermesError::configuration(
                "inject_headers: carrier is absent",
            ));
        };
        for (name, value) in self.headers() {
            let header_name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(header_name) => header_name,
                Err(err) => {
                    self.record_error(HermesError::invalid_header(name, err));
                    continue;
                }
            };
            match HeaderValue::from_str(&value) {
                Ok(header_value) => {
                    carrier.headers_mut().insert(header_name, header_value);
                }
                Err(err) => {
                    self.record_error(HermesError::invalid_header(name, err));
                }
            }
        }
        self
    }

    /// Sets one query parameter per attribute on `carrier`.
    ///
    /// Existing parameters are preserved and the query is re-encoded with keys
    /// sorted. An already-parsed form sees the injected values too.
    pub fn inject_params(&mut self, carrier: Option<&mut dyn Carrier>) -> &mut Self {
        let Some(carrier) = carrier else {
            return self.record_error(HermesError::configuration(
                "inject_params: carrier is absent",
            ));
        };
        let mut query = carrier.query();
        for (name, value) in self.params() {
            if let Some(form) = carrier.parsed_form_mut() {
                form.set(name.clone(), value.clone());
            }
            query.set(name, value);
        }
        carrier.set_raw_query(query.encode());
        self
    }

    /// Reads attributes from the prefixed headers and form parameters of
    /// `carrier`.
    ///
    /// The form is parsed if it was not already. Each matching name is stored
    /// stripped of its prefix and canonicalized, with its first value.
    pub fn extract(&mut self, carrier: Option<&mut dyn Carrier>) -> &mut Self {
        let Some(carrier) = carrier else {
            return self.record_error(HermesError::configuration("extract: carrier is absent"));
        };

        let prefix_len = self.header_prefix.len();
        let mut failures = Vec::new();
        for name in carrier.headers().keys() {
            let name = name.as_str();
            if !canonical_header_key(name).starts_with(&self.header_prefix) {
                continue;
            }
            let Some(stripped) = name.get(prefix_len..) else {
                continue;
            };
            let Some(value) = carrier.headers().get(name) else {
                continue;
            };
            match value.to_str() {
                Ok(value) => {
                    self.attributes.insert(canonical_key(stripped), value.to_string());
                }
                Err(err) => failures.push(HermesError::invalid_header(name, err)),
            }
        }

        let prefix_len = self.param_prefix.len();
        for (name, values) in carrier.form().iter() {
            let name = canonical_key(name);
            if !name.starts_with(&self.param_prefix) {
                continue;
            }
            if let (Some(stripped), Some(value)) = (name.get(prefix_len..), values.first()) {
                self.attributes.insert(stripped.to_string(), value.clone());
            }
        }

        for failure in failures {
            self.record_error(failure);
        }
        self
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Baggage {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.merge_attributes(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{ErrorCategory, HttpCarrier};
    use http::Method;

    fn carrier(url: &str) -> HttpCarrier {
        HttpCarrier::from_url(Method::GET, url).unwrap()
    }

    fn user_baggage() -> Baggage {
        Baggage::new(["x-tprOxy", "user"])
    }

    #[test]
    fn test_new_derives_prefixes() {
        let baggage = Baggage::new(["x", "user"]);
        assert_eq!(baggage.header_prefix(), "X-User-");
        assert_eq!(baggage.param_prefix(), "x-user-");
        assert!(baggage.attributes().is_empty());
        assert!(baggage.errors().is_empty());
    }

    #[test]
    fn test_new_without_domains() {
        let baggage = Baggage::new(Vec::<String>::new());
        assert_eq!(baggage.header_prefix(), "-");
        assert_eq!(baggage.param_prefix(), "-");
    }

    #[test]
    fn test_prefix_overrides_are_canonicalized() {
        let baggage = Baggage::new(["x", "user"])
            .with_header_prefix("x-proxy_user-")
            .with_param_prefix("X-Proxy_User-");
        assert_eq!(baggage.header_prefix(), "X-Proxy-User-");
        assert_eq!(baggage.param_prefix(), "x-proxy-user-");
    }

    #[test]
    fn test_set_attribute_canonicalizes() {
        let mut baggage = user_baggage();
        baggage.set_attribute("auth_backend", "ssoauth");
        assert_eq!(baggage.attr("auth-backend"), "ssoauth");
        assert_eq!(baggage.attr("Auth_Backend"), "ssoauth");
        assert_eq!(baggage.attr("auth-backend").name(), "auth-backend");
        assert!(baggage.attr("missing").is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut baggage = user_baggage();
        baggage.set_attribute("tid", "1").set_attribute("TID", "2");
        assert_eq!(baggage.attributes().len(), 1);
        assert_eq!(baggage.attr("tid").int64().unwrap(), 2);
    }

    #[test]
    fn test_merge_attributes() {
        let mut baggage = user_baggage().with_attribute("tid", "1");
        baggage.merge_attributes([("uid", "2"), ("tid", "3")]);
        assert_eq!(baggage.attr("tid"), "3");
        assert_eq!(baggage.attr("uid"), "2");
    }

    #[test]
    fn test_extend() {
        let mut baggage = user_baggage();
        baggage.extend(vec![("user_name".to_string(), "alice".to_string())]);
        assert_eq!(baggage.attr("user-name"), "alice");
    }

    #[test]
    fn test_replace_attributes_empty_clears() {
        let mut baggage = user_baggage().with_attribute("tid", "1");
        baggage.replace_attributes(Vec::<(String, String)>::new());
        assert!(baggage.attr("tid").is_empty());
        assert!(baggage.attributes().is_empty());
    }

    #[test]
    fn test_replace_attributes_non_empty_merges() {
        let mut baggage = user_baggage().with_attribute("tid", "1");
        baggage.replace_attributes([("uid", "2")]);
        assert_eq!(baggage.attr("tid"), "1");
        assert_eq!(baggage.attr("uid"), "2");
    }

    #[test]
    fn test_apply_preset() {
        fn sso(baggage: &mut Baggage) {
            baggage.set_attribute("auth_backend", "ssoauth");
        }
        let mut baggage = user_baggage();
        baggage.apply(sso).apply(|b| {
            b.set_attribute("tid", "9");
        });
        assert_eq!(baggage.attr("auth-backend"), "ssoauth");
        assert_eq!(baggage.attr("tid"), "9");
    }

    #[test]
    fn test_headers_and_params() {
        let mut baggage = user_baggage();
        baggage
            .set_attribute("uid", "2")
            .set_attribute("user_name", "alice");
        let headers = baggage.headers();
        assert_eq!(headers["X-Tproxy-User-User-Name"], "alice");
        assert_eq!(headers["X-Tproxy-User-Uid"], "2");
        let params = baggage.params();
        assert_eq!(params["x-tproxy-user-uid"], "2");
        assert_eq!(params["x-tproxy-user-user-name"], "alice");
    }

    #[test]
    fn test_absent_carrier_records_errors() {
        let mut baggage = user_baggage().with_attribute("tid", "1");
        baggage
            .inject_headers(None)
            .inject_params(None)
            .extract(None);
        assert_eq!(baggage.errors().len(), 3);
        assert!(baggage
            .errors()
            .iter()
            .all(|err| err.category() == ErrorCategory::Configuration));
        assert_eq!(baggage.take_errors().len(), 3);
        assert!(baggage.errors().is_empty());
    }

    #[test]
    fn test_inject_headers() {
        let mut baggage = user_baggage();
        baggage.set_attribute("uid", "2").set_attribute("user_name", "alice");
        let mut request = carrier("http://authcar.amap.com/ws/authcar/jwks");
        baggage.inject_headers(Some(&mut request));
        assert_eq!(request.headers()["X-Tproxy-User-User-Name"], "alice");
        assert_eq!(request.headers()["x-tproxy-user-uid"], "2");
        assert!(baggage.errors().is_empty());
    }

    #[test]
    fn test_inject_headers_replaces_existing() {
        let mut request = HttpCarrier::builder()
            .header("x-tproxy-user-uid", "1")
            .header("x-tproxy-user-uid", "0")
            .build()
            .unwrap();
        let mut baggage = user_baggage().with_attribute("uid", "2");
        baggage.inject_headers(Some(&mut request));
        let values: Vec<_> = request.headers().get_all("x-tproxy-user-uid").iter().collect();
        assert_eq!(values, ["2"]);
    }

    #[test]
    fn test_inject_headers_skips_invalid_value() {
        let mut baggage = user_baggage()
            .with_attribute("ok", "1")
            .with_attribute("bad", "line\nbreak");
        let mut request = carrier("/");
        baggage.inject_headers(Some(&mut request));
        assert_eq!(request.headers()["x-tproxy-user-ok"], "1");
        assert!(request.headers().get("x-tproxy-user-bad").is_none());
        assert_eq!(baggage.errors().len(), 1);
        assert_eq!(baggage.errors()[0].category(), ErrorCategory::InvalidHeader);
    }

    #[test]
    fn test_inject_params_preserves_and_sorts() {
        let mut baggage = user_baggage().with_attribute("tid", "2");
        let mut request = carrier("/ws?z=1&a=0");
        baggage.inject_params(Some(&mut request));
        assert_eq!(request.raw_query(), "a=0&x-tproxy-user-tid=2&z=1");
    }

    #[test]
    fn test_inject_params_updates_parsed_form() {
        let mut baggage = user_baggage().with_attribute("tid", "2");
        let mut request = carrier("/ws?x-tproxy-user-tid=1");
        assert_eq!(request.form().get("x-tproxy-user-tid"), Some("1"));
        baggage.inject_params(Some(&mut request));
        assert_eq!(request.form().get_all("x-tproxy-user-tid"), ["2"]);
    }

    #[test]
    fn test_extract_from_empty_request() {
        let mut request = carrier("http://authcar.amap.com/ws/authcar/jwks");
        let mut baggage = Baggage::new(["x-tproxy", "user"]);
        assert!(baggage.extract(Some(&mut request)).attr("tid").is_empty());
        assert!(baggage.errors().is_empty());
    }

    #[test]
    fn test_extract_headers_first_value() {
        let mut request = HttpCarrier::builder()
            .header("X-Tproxy-User-Mozi_Tid", "7")
            .header("x-tproxy-user-uid", "2")
            .header("x-tproxy-user-uid", "3")
            .header("x-other-uid", "4")
            .build()
            .unwrap();
        let mut baggage = Baggage::new(["x-tproxy", "user"]);
        baggage.extract(Some(&mut request));
        assert_eq!(baggage.attr("mozi-tid"), "7");
        assert_eq!(baggage.attr("uid"), "2");
        assert_eq!(baggage.attributes().len(), 2);
    }

    #[test]
    fn test_extract_params_canonicalizes_names() {
        let mut request = carrier("/ws?X_Tproxy_User_Tid=5&other=1");
        let mut baggage = Baggage::new(["x-tproxy", "user"]);
        baggage.extract(Some(&mut request));
        assert_eq!(baggage.attr("tid").int64().unwrap(), 5);
        assert_eq!(baggage.attributes().len(), 1);
        assert!(request.is_form_parsed());
    }

    #[test]
    fn test_extract_records_non_utf8_header() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            "x-tproxy-user-name",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        let mut request = HttpCarrier::builder().headers(headers).build().unwrap();
        let mut baggage = Baggage::new(["x-tproxy", "user"]);
        baggage.extract(Some(&mut request));
        assert!(baggage.attr("name").is_empty());
        assert_eq!(baggage.errors().len(), 1);
        assert_eq!(baggage.errors()[0].category(), ErrorCategory::InvalidHeader);
    }
}
