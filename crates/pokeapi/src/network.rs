//! Generic JSON-over-HTTP transport.
//!
//! [`NetworkService`] turns any [`Requestable`] into a single HTTP call
//! against a fixed [`Server`] base URL, validates the status, and decodes
//! the JSON body into the caller's type using [`reqwest`].
//!
//! Everything that goes wrong once the request is under way (a
//! connection fault, a non-2xx status, an undecodable body) surfaces as
//! [`NetworkError::Transport`] wrapping the underlying cause. Only URL
//! validation fails unwrapped, before any network activity. Use
//! [`NetworkError::root`] or [`NetworkError::status_code`] to look
//! through the wrapping.

use std::collections::HashMap;
use std::fmt;

use reqwest::Url;
use serde::de::DeserializeOwned;

/// String-keyed request parameters. Iteration order is unspecified.
pub type Parameters = HashMap<String, String>;

/// Boxed underlying cause carried by [`NetworkError::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// HTTP methods supported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The uppercase method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Where request parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// URL query items (GET only).
    Query,
    /// A JSON object body (non-GET only).
    Json,
}

/// Anything the transport can send.
pub trait Requestable: Send + Sync {
    /// HTTP method to send with.
    fn method(&self) -> HttpMethod;

    /// Where [`Requestable::parameters`] are placed.
    fn encoding(&self) -> ParameterEncoding;

    /// Path relative to the server base URL, e.g. `pokemon/25`.
    fn path(&self) -> String;

    /// Key/value parameters. An empty map adds neither query nor body.
    fn parameters(&self) -> Parameters;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The endpoint URL is malformed or not http(s) with a host.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server returned a status outside 200..=299.
    #[error("Request failed with HTTP status {status_code}")]
    RequestFailed {
        /// HTTP status code.
        status_code: u16,
    },

    /// The body did not match the expected JSON shape.
    #[error("Failed to decode response body: {0}")]
    DecodingFailed(#[source] serde_json::Error),

    /// Anything that failed while the request was in flight.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),
}

impl NetworkError {
    /// The innermost [`NetworkError`], looking through `Transport`
    /// wrapping. A `Transport` whose cause is not a [`NetworkError`]
    /// (DNS, connection reset, ...) is its own root.
    pub fn root(&self) -> &NetworkError {
        let mut current = self;
        while let NetworkError::Transport(inner) = current {
            match inner.downcast_ref::<NetworkError>() {
                Some(wrapped) => current = wrapped,
                None => break,
            }
        }
        current
    }

    /// HTTP status of a `RequestFailed`, whether wrapped or not.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            NetworkError::RequestFailed { status_code } => Some(*status_code),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// URL validation
// ---------------------------------------------------------------------------

/// Parse `value` as an absolute http(s) URL with a non-empty host.
pub fn parse_request_url(value: &str) -> Result<Url, NetworkError> {
    let url = Url::parse(value).map_err(|_| NetworkError::InvalidUrl(value.to_string()))?;

    let scheme_ok = matches!(url.scheme(), "http" | "https");
    let host_ok = url.host_str().is_some_and(|host| !host.is_empty());
    if !scheme_ok || !host_ok {
        return Err(NetworkError::InvalidUrl(value.to_string()));
    }

    Ok(url)
}

/// `"https://...".parse_as_request_url()` convenience over
/// [`parse_request_url`].
pub trait RequestUrlExt {
    fn parse_as_request_url(&self) -> Result<Url, NetworkError>;
}

impl RequestUrlExt for str {
    fn parse_as_request_url(&self) -> Result<Url, NetworkError> {
        parse_request_url(self)
    }
}

// ---------------------------------------------------------------------------
// Server + service
// ---------------------------------------------------------------------------

/// The fixed base URL every request path is appended to.
#[derive(Debug, Clone)]
pub struct Server {
    base_url: Url,
}

impl Server {
    /// Create a server from its base URL.
    ///
    /// # Arguments
    /// * `base_url` - Absolute `http` or `https` URL, e.g. `https://pokeapi.co/api/v2/`
    ///
    /// # Errors
    /// [`NetworkError::InvalidUrl`] when `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        Ok(Self {
            base_url: parse_request_url(base_url)?,
        })
    }

    /// The validated base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL as a path component.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, NetworkError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        parse_request_url(&format!("{base}/{path}"))
    }
}

/// A fully composed request, ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// JSON object body, present only for non-GET JSON-encoded requests
    /// with parameters.
    pub body: Option<serde_json::Value>,
}

/// HTTP transport bound to one [`Server`].
#[derive(Debug, Clone)]
pub struct NetworkService {
    client: reqwest::Client,
    server: Server,
}

impl NetworkService {
    /// Create a service with its own [`reqwest::Client`].
    ///
    /// # Arguments
    /// * `server` - Base URL every request path is appended to
    pub fn new(server: Server) -> Self {
        Self {
            client: reqwest::Client::new(),
            server,
        }
    }

    /// Create a service reusing an existing [`reqwest::Client`]
    /// (useful for sharing a connection pool with other components).
    pub fn with_client(client: reqwest::Client, server: Server) -> Self {
        Self { client, server }
    }

    /// The server this service talks to.
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Compose URL and body for `requestable` without sending anything.
    ///
    /// Query items are attached only for GET + [`ParameterEncoding::Query`];
    /// a JSON body only for non-GET + [`ParameterEncoding::Json`]. Empty
    /// parameter maps produce neither.
    pub fn prepare<R>(&self, requestable: &R) -> Result<PreparedRequest, NetworkError>
    where
        R: Requestable + ?Sized,
    {
        let method = requestable.method();
        let encoding = requestable.encoding();
        let parameters = requestable.parameters();
        let mut url = self.server.endpoint_url(&requestable.path())?;

        if method == HttpMethod::Get
            && encoding == ParameterEncoding::Query
            && !parameters.is_empty()
        {
            url.query_pairs_mut().extend_pairs(parameters.iter());
        }

        let body = (method != HttpMethod::Get
            && encoding == ParameterEncoding::Json
            && !parameters.is_empty())
        .then(|| {
            serde_json::Value::Object(
                parameters
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::String(value)))
                    .collect(),
            )
        });

        Ok(PreparedRequest { method, url, body })
    }

    /// Send `requestable` and decode the JSON response into `T`.
    pub async fn request<T, R>(&self, requestable: &R) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
        R: Requestable + ?Sized,
    {
        let prepared = self.prepare(requestable)?;
        tracing::debug!(method = %prepared.method, url = %prepared.url, "Sending request");

        self.execute(prepared).await.map_err(|e| {
            tracing::debug!(error = %e, "Request failed");
            NetworkError::Transport(e)
        })
    }

    // ---- private helpers ----

    /// Issue the call, check the status and decode the body.
    async fn execute<T: DeserializeOwned>(&self, prepared: PreparedRequest) -> Result<T, BoxError> {
        let mut builder = self.client.request(prepared.method.into(), prepared.url);
        if let Some(body) = &prepared.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let response = Self::ensure_success(response)?;
        let bytes = response.bytes().await?;

        let decoded = serde_json::from_slice(&bytes).map_err(NetworkError::DecodingFailed)?;
        Ok(decoded)
    }

    /// Return the response unchanged on a 2xx status, or a
    /// [`NetworkError::RequestFailed`] carrying the status otherwise.
    fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::RequestFailed {
                status_code: status.as_u16(),
            });
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
