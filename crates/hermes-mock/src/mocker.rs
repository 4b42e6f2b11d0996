//! The [`ResponseMocker`] capability and the built-in strategies.

use crate::error::{MockError, MockResult};
use crate::options::MockOptions;
use async_trait::async_trait;
use bytes::Bytes;
use hermes_core::{Carrier, HermesError, HermesResult};
use http::{HeaderName, HeaderValue, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Produces mock responses for matched requests.
///
/// Implementations are registered as templates under their [`id`](Self::id)
/// in a [`TypeRegistry`](hermes_core::TypeRegistry). A template is never used
/// directly; [`hydrate`](Self::hydrate) builds a configured instance from the
/// JSON that named it.
#[async_trait]
pub trait ResponseMocker: Send + Sync + fmt::Debug {
    /// Discriminator used in the `response_mocker` field.
    fn id(&self) -> &str;

    /// Builds a fresh, configured instance of this strategy from `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Deserialization`] if `raw` does not match the
    /// strategy's fields.
    fn hydrate(&self, raw: &serde_json::Value) -> HermesResult<Arc<dyn ResponseMocker>>;

    /// Returns `true` if responses should come from the real upstream.
    fn is_transparent(&self) -> bool {
        false
    }

    /// Options shared by all strategies.
    fn options(&self) -> &MockOptions;

    /// Produces the mock response for `carrier`.
    async fn mock(&self, carrier: &dyn Carrier) -> MockResult<Response<Bytes>>;
}

/// Deserializes `raw` into the strategy `T`.
///
/// The usual body of [`ResponseMocker::hydrate`].
pub fn hydrate_as<T>(id: &str, raw: &serde_json::Value) -> HermesResult<Arc<dyn ResponseMocker>>
where
    T: ResponseMocker + DeserializeOwned + 'static,
{
    let mocker = T::deserialize(raw).map_err(|err| HermesError::deserialization(id, err))?;
    Ok(Arc::new(mocker))
}

/// Client shared by every strategy that fetches from a URL.
static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn client(url: &str) -> MockResult<&'static reqwest::Client> {
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(100)
        .build()
        .map_err(|e| MockError::upstream(url, "failed to create client", e))?;
    Ok(CLIENT.get_or_init(|| client))
}

async fn fetch(url: &str) -> MockResult<reqwest::Response> {
    if url.is_empty() {
        return Err(MockError::invalid_response("no URL configured to fetch from"));
    }
    debug!(url, "Fetching mock response");
    client(url)?
        .get(url)
        .send()
        .await
        .map_err(|e| MockError::upstream(url, "request failed", e))
}

/// Marks that the real upstream response should be used.
///
/// This is the strategy for blank configuration and for an empty
/// `response_mocker`. It cannot produce a response itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparentResponseMocker {
    /// Shared options.
    pub options: MockOptions,
}

impl TransparentResponseMocker {
    /// Discriminator of this strategy.
    pub const ID: &'static str = "";
}

#[async_trait]
impl ResponseMocker for TransparentResponseMocker {
    fn id(&self) -> &str {
        Self::ID
    }

    fn hydrate(&self, raw: &serde_json::Value) -> HermesResult<Arc<dyn ResponseMocker>> {
        hydrate_as::<Self>(Self::ID, raw)
    }

    fn is_transparent(&self) -> bool {
        true
    }

    fn options(&self) -> &MockOptions {
        &self.options
    }

    async fn mock(&self, _carrier: &dyn Carrier) -> MockResult<Response<Bytes>> {
        Err(MockError::Transparent)
    }
}

/// Fetches a complete response (status, headers, body) from a URL.
///
/// Typically points at a mock platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMockerFromURL {
    /// Shared options.
    pub options: MockOptions,
    /// URL whose response is returned as the mock.
    pub response_from_url: String,
}

impl ResponseMockerFromURL {
    /// Discriminator of this strategy.
    pub const ID: &'static str = "ResponseMockerFromURL";

    /// Creates a strategy fetching from `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            options: MockOptions::default(),
            response_from_url: url.into(),
        }
    }
}

#[async_trait]
impl ResponseMocker for ResponseMockerFromURL {
    fn id(&self) -> &str {
        Self::ID
    }

    fn hydrate(&self, raw: &serde_json::Value) -> HermesResult<Arc<dyn ResponseMocker>> {
        hydrate_as::<Self>(Self::ID, raw)
    }

    fn options(&self) -> &MockOptions {
        &self.options
    }

    async fn mock(&self, _carrier: &dyn Carrier) -> MockResult<Response<Bytes>> {
        self.options.apply_latency().await;

        let url = self.response_from_url.as_str();
        let upstream = fetch(url).await?;
        let status = upstream.status();
        let version = upstream.version();
        let headers = upstream.headers().clone();
        let body = upstream
            .bytes()
            .await
            .map_err(|e| MockError::upstream(url, "failed to read body", e))?;

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.version_mut() = version;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Builds a response from a status code, headers and a body.
///
/// When both `body` and `body_from_url` are set, `body` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMockerBuilder {
    /// Shared options.
    pub options: MockOptions,
    /// Response status.
    pub status_code: u16,
    /// Response headers, each name mapping to its values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, Vec<String>>,
    /// Literal response body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// URL whose response body is used when `body` is empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_from_url: String,
}

impl Default for ResponseMockerBuilder {
    fn default() -> Self {
        Self {
            options: MockOptions::default(),
            status_code: StatusCode::OK.as_u16(),
            header: BTreeMap::new(),
            body: String::new(),
            body_from_url: String::new(),
        }
    }
}

impl ResponseMockerBuilder {
    /// Discriminator of this strategy.
    pub const ID: &'static str = "ResponseMockerBuilder";

    /// Creates a builder answering with `status_code` and an empty body.
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Sets the literal body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the URL the body is fetched from.
    #[must_use]
    pub fn with_body_from_url(mut self, url: impl Into<String>) -> Self {
        self.body_from_url = url.into();
        self
    }

    async fn resolve_body(&self) -> MockResult<Bytes> {
        if !self.body.is_empty() {
            return Ok(Bytes::from(self.body.clone()));
        }
        if self.body_from_url.is_empty() {
            return Ok(Bytes::new());
        }
        let url = self.body_from_url.as_str();
        fetch(url)
            .await?
            .bytes()
            .await
            .map_err(|e| MockError::upstream(url, "failed to read body", e))
    }
}

#[async_trait]
impl ResponseMocker for ResponseMockerBuilder {
    fn id(&self) -> &str {
        Self::ID
    }

    fn hydrate(&self, raw: &serde_json::Value) -> HermesResult<Arc<dyn ResponseMocker>> {
        hydrate_as::<Self>(Self::ID, raw)
    }

    fn options(&self) -> &MockOptions {
        &self.options
    }

    async fn mock(&self, _carrier: &dyn Carrier) -> MockResult<Response<Bytes>> {
        self.options.apply_latency().await;

        let status = StatusCode::from_u16(self.status_code).map_err(MockError::invalid_response)?;
        let mut response = Response::new(self.resolve_body().await?);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, values) in &self.header {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(MockError::invalid_response)?;
            for value in values {
                let value = HeaderValue::from_str(value).map_err(MockError::invalid_response)?;
                headers.append(name.clone(), value);
            }
        }
        Ok(response)
    }
}
