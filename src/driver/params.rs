//! Connection and session parameters.
//!
//! [`SessionParams`] is the caller-visible parameters object. Session
//! creation records the negotiated request and the resolved capabilities
//! on it, and may rewrite its connection when the server redirects.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::CapabilityRequest;
use crate::protocol::capabilities::truthy;

// ============================================================================
// Constants
// ============================================================================

/// Default protocol scheme.
pub const DEFAULT_PROTOCOL: &str = "http";

/// Default remote end host.
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Default remote end port (Selenium standalone).
pub const DEFAULT_PORT: u16 = 4444;

/// Default base path.
pub const DEFAULT_PATH: &str = "/";

// ============================================================================
// ConnectionParams
// ============================================================================

/// Where the remote end is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Protocol scheme (`http` or `https`).
    pub protocol: String,
    /// Host name or address.
    pub hostname: String,
    /// TCP port.
    pub port: u16,
    /// Base path prefixed to every endpoint.
    pub path: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL, DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_PATH)
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.protocol, self.hostname, self.port, self.path)
    }
}

impl ConnectionParams {
    /// Creates connection parameters.
    #[must_use]
    pub fn new(
        protocol: impl Into<String>,
        hostname: impl Into<String>,
        port: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            hostname: hostname.into(),
            port,
            path: path.into(),
        }
    }

    /// Parses parameters from a URL such as `http://127.0.0.1:9515/wd/hub`.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if the URL cannot be parsed
    /// - [`Error::Config`] if it has no host or no known port
    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;
        let hostname = url
            .host_str()
            .ok_or_else(|| Error::config(format!("URL has no host: {input}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::config(format!("URL has no port: {input}")))?;

        Ok(Self::new(url.scheme(), hostname, port, url.path()))
    }

    /// Builds the absolute URL of `path`, which must start with `/`.
    ///
    /// Hub commands are addressed at the server root; everything else is
    /// prefixed with the base path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the parameters do not form a valid URL.
    pub fn url_for(&self, path: &str, is_hub_command: bool) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}://{}:{}",
            self.protocol, self.hostname, self.port
        ))?;

        let full_path = if is_hub_command {
            path.to_string()
        } else {
            join_path(&self.path, path)
        };
        match full_path.split_once('?') {
            Some((path, query)) => {
                url.set_path(path);
                url.set_query(Some(query));
            }
            None => url.set_path(&full_path),
        }

        Ok(url)
    }

    /// Extracts a direct-connect target from resolved capabilities.
    ///
    /// All four of protocol, host, port and path must be present; the path
    /// may be empty. Unprefixed keys take precedence over `appium:` ones.
    #[must_use]
    pub fn direct_connect(capabilities: &Value) -> Option<Self> {
        let lookup = |key: &str| {
            capabilities
                .get(key)
                .or_else(|| capabilities.get(format!("appium:{key}")))
        };

        let protocol = lookup("directConnectProtocol")
            .filter(|v| truthy(v))
            .and_then(Value::as_str)?;
        let hostname = lookup("directConnectHost")
            .filter(|v| truthy(v))
            .and_then(Value::as_str)?;
        let port = lookup("directConnectPort").and_then(port_value)?;
        let path = lookup("directConnectPath").and_then(Value::as_str)?;

        Some(Self::new(protocol, hostname, port, path))
    }
}

/// Joins a base path and an endpoint without doubling the separator.
#[must_use]
pub fn join_path(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

/// Accepts ports given as numbers or numeric strings.
fn port_value(value: &Value) -> Option<u16> {
    let port = match value {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    port.filter(|port| *port != 0)
}

// ============================================================================
// SessionParams
// ============================================================================

/// Parameters of a session, visible to and owned by the caller.
///
/// Before session creation `capabilities` holds what the caller asks for.
/// After a successful start it holds what the server resolved, and
/// `requested_capabilities` keeps the negotiated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Where the remote end is reached.
    pub connection: ConnectionParams,
    /// Requested, later resolved, capabilities.
    pub capabilities: Value,
    /// Dual-form request recorded by a successful session start.
    #[serde(rename = "requestedCapabilities", skip_serializing_if = "Option::is_none")]
    pub requested_capabilities: Option<CapabilityRequest>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            connection: ConnectionParams::default(),
            capabilities: Value::Object(Map::new()),
            requested_capabilities: None,
        }
    }
}

impl SessionParams {
    /// Creates parameters for `capabilities` on the default connection.
    #[must_use]
    pub fn new(capabilities: Value) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Replaces the connection.
    #[inline]
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionParams) -> Self {
        self.connection = connection;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
