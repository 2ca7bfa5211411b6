//! Builder pattern for session parameters.
//!
//! Provides a fluent API for configuring and validating [`SessionParams`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use webdriver_remote::SessionParams;
//!
//! # fn example() -> webdriver_remote::Result<()> {
//! let params = SessionParams::builder()
//!     .hostname("127.0.0.1")
//!     .port(9515)
//!     .capability("browserName", json!("chrome"))
//!     .build()?;
//! assert_eq!(params.connection.to_string(), "http://127.0.0.1:9515/");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::params::{ConnectionParams, SessionParams};

// ============================================================================
// SessionParamsBuilder
// ============================================================================

/// Builder for [`SessionParams`].
///
/// Use [`SessionParams::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct SessionParamsBuilder {
    /// Remote end URL, parsed on build.
    url: Option<String>,
    /// Individually set connection fields, applied after the URL.
    protocol: Option<String>,
    hostname: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    /// Capabilities, replaced wholesale or extended key by key.
    capabilities: Option<Value>,
}

impl SessionParams {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionParamsBuilder {
        SessionParamsBuilder::new()
    }
}

// ============================================================================
// SessionParamsBuilder Implementation
// ============================================================================

impl SessionParamsBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remote end from a URL, e.g. `http://localhost:4444/wd/hub`.
    ///
    /// Fields set individually override the parts of the URL.
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the protocol scheme.
    #[inline]
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Sets the host name.
    #[inline]
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Sets the port.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the base path.
    #[inline]
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replaces all capabilities.
    ///
    /// Accepts either a flat legacy mapping or a structured
    /// `{ alwaysMatch, firstMatch }` object.
    #[inline]
    #[must_use]
    pub fn capabilities(mut self, capabilities: Value) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Sets a single capability in the flat mapping.
    #[must_use]
    pub fn capability(mut self, key: impl Into<String>, value: Value) -> Self {
        let caps = self
            .capabilities
            .get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = caps {
            map.insert(key.into(), value);
        }
        self
    }

    /// Builds the parameters with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] / [`Error::Config`] if the URL is invalid
    /// - [`Error::Config`] for an unsupported protocol, empty hostname,
    ///   zero port, a path not starting with `/`, or non-object capabilities
    pub fn build(self) -> Result<SessionParams> {
        let connection = self.resolve_connection()?;
        Self::validate_connection(&connection)?;
        let capabilities = self.validate_capabilities()?;

        Ok(SessionParams::new(capabilities).with_connection(connection))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionParamsBuilder {
    fn resolve_connection(&self) -> Result<ConnectionParams> {
        let mut connection = match &self.url {
            Some(url) => ConnectionParams::from_url(url)?,
            None => ConnectionParams::default(),
        };

        if let Some(protocol) = &self.protocol {
            connection.protocol.clone_from(protocol);
        }
        if let Some(hostname) = &self.hostname {
            connection.hostname.clone_from(hostname);
        }
        if let Some(port) = self.port {
            connection.port = port;
        }
        if let Some(path) = &self.path {
            connection.path.clone_from(path);
        }

        Ok(connection)
    }

    fn validate_connection(connection: &ConnectionParams) -> Result<()> {
        if !matches!(connection.protocol.as_str(), "http" | "https") {
            return Err(Error::config(format!(
                "Unsupported protocol: {}\n\
                 Use \"http\" or \"https\".",
                connection.protocol
            )));
        }

        if connection.hostname.is_empty() {
            return Err(Error::config(
                "Hostname is required. Use .hostname() or .url() to set it.\n\
                 Example: SessionParams::builder().hostname(\"localhost\")",
            ));
        }

        if connection.port == 0 {
            return Err(Error::config("Port must be non-zero."));
        }

        if !connection.path.starts_with('/') {
            return Err(Error::config(format!(
                "Path must start with '/': {}",
                connection.path
            )));
        }

        Ok(())
    }

    fn validate_capabilities(&self) -> Result<Value> {
        match &self.capabilities {
            None => Ok(Value::Object(Map::new())),
            Some(caps @ Value::Object(_)) => Ok(caps.clone()),
            Some(other) => Err(Error::config(format!(
                "Capabilities must be a JSON object, got: {other}"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
