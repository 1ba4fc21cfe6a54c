//! Blocking JSON HTTP client shared by the service wrappers.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Query or header pairs, in request order.
pub type Pairs = [(String, String)];

/// HTTP client for a single service endpoint.
///
/// Every request asks for `application/json`. Non-success statuses are turned
/// into typed [`ApiError`]s and nothing is retried.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: Client,
    endpoint: Url,
}

impl JsonClient {
    /// Build a client from `config`, applying its timeout and default headers.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let endpoint = config
            .endpoint_url()
            .map_err(|e| ApiError::InvalidArgument(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(header_map(
                config.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            )?)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Join `path` onto the endpoint and append `query` pairs.
    pub fn url_for(&self, path: &str, query: &Pairs) -> Result<Url, ApiError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::InvalidArgument(format!("bad request path '{path}': {e}")))?;
        if !query.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (name, value) in query {
                serializer.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// GET `path` with `query` and decode the JSON response.
    pub fn get_json(&self, path: &str, query: &Pairs) -> Result<Value, ApiError> {
        self.get_json_with_headers(path, query, &[])
    }

    /// GET with extra per-request headers on top of the configured defaults.
    pub fn get_json_with_headers(
        &self,
        path: &str,
        query: &Pairs,
        headers: &Pairs,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path, query)?;
        let extra = header_map(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let request = self.client.get(url.clone()).headers(extra);
        self.execute(Method::GET, &url, request)
    }

    /// GET and deserialize into a caller type.
    pub fn get_json_as<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Pairs,
    ) -> Result<T, ApiError> {
        let value = self.get_json(path, query)?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST `body` as JSON.
    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send_with_body(Method::POST, path, body)
    }

    /// PUT `body` as JSON.
    pub fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send_with_body(Method::PUT, path, body)
    }

    /// PATCH `body` as JSON.
    pub fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.send_with_body(Method::PATCH, path, body)
    }

    /// DELETE `path`; an empty response body decodes as `null`.
    pub fn delete(&self, path: &str, query: &Pairs) -> Result<Value, ApiError> {
        let url = self.url_for(path, query)?;
        let request = self.client.delete(url.clone());
        self.execute(Method::DELETE, &url, request)
    }

    fn send_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path, &[])?;
        let request = self.client.request(method.clone(), url.clone()).json(body);
        self.execute(method, &url, request)
    }

    fn execute(&self, method: Method, url: &Url, request: RequestBuilder) -> Result<Value, ApiError> {
        debug!(%method, %url, "sending request");
        let response = request.header(ACCEPT, "application/json").send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "request failed");
            return Err(ApiError::from_status(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn header_map<'a>(headers: impl Iterator<Item = (&'a str, &'a str)>) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidArgument(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidArgument(format!("invalid header value for '{name}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
