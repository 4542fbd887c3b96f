//! HTTP transport: verbs, JSON bodies, bearer authentication and error
//! normalisation.
//!
//! The resource layer only depends on the [`Transport`] capability; the
//! reqwest-backed [`HttpTransport`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::error::{Error, Result};

pub use reqwest::Method;

/// User agent attached to every request.
pub const USER_AGENT: &str = concat!("kleister-cli/", env!("CARGO_PKG_VERSION"));
/// Header carrying the per-invocation correlation id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
/// Highest status still treated as success.
pub const MAX_SUCCESS_STATUS: u16 = 206;

/// Request handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute API path, e.g. `/api/packs/tekkit`.
    pub path: String,
    /// JSON body, sent with `Content-Type: application/json` when present.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Successful response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status, at most [`MAX_SUCCESS_STATUS`].
    pub status: u16,
    /// Raw response body, possibly empty.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the server sent a body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.iter().any(|byte| !byte.is_ascii_whitespace())
    }
}

/// Narrow capability the resource layer needs from the network.
///
/// Implementations attach credentials, encode the body and map any status
/// above [`MAX_SUCCESS_STATUS`] to an [`Error`] via [`Error::from_status`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Whether a bearer token is configured.
    fn has_token(&self) -> bool;

    /// A transport sharing this one's connection state but sending `token`.
    #[must_use]
    fn with_token(&self, token: String) -> Self
    where
        Self: Sized;
}

/// Construction parameters for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API base URL, e.g. `http://localhost:8080`.
    pub base_url: Url,
    /// Bearer token attached to every request.
    pub token: Option<String>,
    /// Per-request deadline.
    pub timeout: Option<Duration>,
    /// Correlation id sent as `x-request-id`.
    pub request_id: Option<String>,
}

impl TransportConfig {
    /// Configuration with only a base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: None,
            request_id: None,
        }
    }
}

/// reqwest-backed transport owning one long-lived HTTP client.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
    gate: Mutex<()>,
}

impl HttpTransport {
    /// Build the HTTP client and transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the base URL is not an absolute
    /// `http`/`https` URL or the request id is not a valid header value, and
    /// [`Error::Network`] when the TLS backend cannot be initialised.
    pub fn new(config: TransportConfig) -> Result<Self> {
        if !matches!(config.base_url.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "server URL '{}' must use http or https",
                config.base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| {
                Error::validation("request identifier contains invalid characters")
            })?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| Error::network(config.base_url.as_str(), err))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            token: config.token.filter(|token| !token.trim().is_empty()),
            gate: Mutex::new(()),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Shared HTTP client, reused for asset downloads.
    #[must_use]
    pub const fn http_client(&self) -> &Client {
        &self.client
    }

    /// Resolve an API path against the base URL, keeping any path prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        joined
            .parse::<Url>()
            .map_err(|err| Error::validation(format!("invalid request URL '{joined}': {err}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.endpoint(&request.path)?;
        let _serialized = self.gate.lock().await;

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| Error::network(url.as_str(), err))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| Error::network(url.as_str(), err))?
            .to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            bytes = body.len(),
            "api request completed"
        );

        if status > MAX_SUCCESS_STATUS {
            return Err(Error::from_status(status, &body));
        }
        Ok(ApiResponse { status, body })
    }

    fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token).filter(|token| !token.trim().is_empty()),
            gate: Mutex::new(()),
        }
    }
}
