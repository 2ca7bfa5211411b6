//! reqwest-backed HTTP transport.
//!
//! Sends JSON bodies with `Content-Type: application/json` and decodes
//! replies leniently:
//!
//! | Reply body | Decoded as |
//! |------------|------------|
//! | empty | `None` |
//! | valid JSON | the JSON value |
//! | anything else | a JSON string holding the text |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, trace};

use crate::driver::ConnectionParams;
use crate::error::{Result, TransportError};
use crate::protocol::command::HttpMethod;
use crate::surface::PreparedRequest;

use super::{HttpReply, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Default overall request timeout.
///
/// Session creation on a busy grid can take minutes.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Default TCP connect timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("webdriver-remote/", env!("CARGO_PKG_VERSION"));

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// ============================================================================
// HttpTransport
// ============================================================================

/// Transport sending requests over HTTP(S) with a shared reqwest client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if the TLS
    /// backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a transport builder.
    #[inline]
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Wraps an existing reqwest client.
    #[inline]
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        connection: &ConnectionParams,
        request: &PreparedRequest,
    ) -> std::result::Result<HttpReply, TransportError> {
        let url = connection
            .url_for(&request.path, request.is_hub_command)
            .map_err(|e| TransportError::other(e.to_string()))?;

        debug!(method = %request.method, %url, "Sending request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(body) = &request.body {
            trace!(%body, "Request body");
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        debug!(status, len = bytes.len(), "Received reply");

        Ok(HttpReply::new(status, decode_body(&bytes)))
    }
}

// ============================================================================
// HttpTransportBuilder
// ============================================================================

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpTransportBuilder {
    /// Sets the overall request timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[inline]
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if the client
    /// cannot be constructed.
    pub fn build(self) -> Result<HttpTransport> {
        let client = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(TransportError::from)?;

        Ok(HttpTransport { client })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Decodes a reply body.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.into_owned())),
    }
}

// ============================================================================
// Tests
// ============================================================================
