//! HTTP transport layer.
//!
//! The session core never talks to the network directly. It hands a
//! [`PreparedRequest`] and the target [`ConnectionParams`] to a
//! [`Transport`] and classifies the [`HttpReply`] it gets back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   PreparedRequest    ┌──────────────┐     HTTP      ┌─────────────┐
//! │  Session         │─────────────────────►│  Transport   │──────────────►│ Remote end  │
//! │  (coordinator)   │◄─────────────────────│              │◄──────────────│ (driver,    │
//! └──────────────────┘  HttpReply | Error   └──────────────┘               │  grid, ...) │
//!                                                                           └─────────────┘
//! ```
//!
//! Timeouts and retries are the transport's concern.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `http` | reqwest-backed [`HttpTransport`] |

// ============================================================================
// Submodules
// ============================================================================

/// reqwest-backed HTTP transport.
pub mod http;

/// Scripted in-memory transport for tests.
#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use http::{HttpTransport, HttpTransportBuilder};

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::driver::ConnectionParams;
use crate::error::TransportError;
use crate::surface::PreparedRequest;

// ============================================================================
// HttpReply
// ============================================================================

/// A raw HTTP reply.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body; `None` when the reply had no body.
    pub body: Option<Value>,
}

impl HttpReply {
    /// Creates a reply.
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Creates a `200 OK` reply with `body`.
    #[inline]
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(200, Some(body))
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Sends one request to a remote end.
///
/// Implementations must be shareable across tasks. A reply with an error
/// status is still `Ok`; only connection-level failures are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` to the remote end described by `connection`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no reply could be obtained.
    async fn send(
        &self,
        connection: &ConnectionParams,
        request: &PreparedRequest,
    ) -> Result<HttpReply, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(
        &self,
        connection: &ConnectionParams,
        request: &PreparedRequest,
    ) -> Result<HttpReply, TransportError> {
        (**self).send(connection, request).await
    }
}
