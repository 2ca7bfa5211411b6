//! Error types for the remote WebDriver client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webdriver_remote::{Result, Session};
//!
//! async fn example(session: &Session<HttpTransport>) -> Result<()> {
//!     let title = session.call("getTitle", vec![]).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Transport | [`Error::Transport`] |
//! | Protocol | [`Error::Response`], [`Error::MalformedBody`] |
//! | Session | [`Error::SessionCreation`], [`Error::InvalidState`], [`Error::NoSession`] |
//! | Command | [`Error::UnknownCommand`], [`Error::InvalidArgument`] |
//! | External | [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;
use std::io::ErrorKind as IoErrorKind;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session parameters are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Connection-level failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Well-formed reply that was classified as a failure.
    #[error("{0}")]
    Response(#[from] ResponseError),

    /// Reply body was absent or could not be interpreted.
    #[error("Malformed response body: {message}")]
    MalformedBody {
        /// Description of what was wrong with the body.
        message: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Session creation failed.
    ///
    /// Carries a translated, human-actionable diagnostic.
    #[error("Failed to create session.\n{diagnostic}")]
    SessionCreation {
        /// Diagnostic produced by the error translator.
        diagnostic: String,
    },

    /// Operation not allowed in the current session state.
    #[error("Invalid session state: expected {expected}, found {found}")]
    InvalidState {
        /// State the operation requires.
        expected: &'static str,
        /// State the session was in.
        found: &'static str,
    },

    /// No session has been established.
    #[error("No active session")]
    NoSession,

    // ========================================================================
    // Command Errors
    // ========================================================================
    /// Command name is not part of the session's command surface.
    #[error("Unknown command: {command}")]
    UnknownCommand {
        /// The unrecognized command name.
        command: String,
    },

    /// Arguments do not match the command's parameter schema.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a malformed body error.
    #[inline]
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    /// Creates a session creation error from a diagnostic message.
    #[inline]
    pub fn session_creation(diagnostic: impl Into<String>) -> Self {
        Self::SessionCreation {
            diagnostic: diagnostic.into(),
        }
    }

    /// Creates an invalid state error.
    #[inline]
    pub fn invalid_state(expected: &'static str, found: &'static str) -> Self {
        Self::InvalidState { expected, found }
    }

    /// Creates an unknown command error.
    #[inline]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport-level error.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the remote end reported a missing element.
    #[inline]
    #[must_use]
    pub fn is_element_missing(&self) -> bool {
        matches!(self, Self::Response(err) if err.kind() == Some("no such element"))
    }

    /// Returns `true` if the remote end reported a stale element reference.
    #[inline]
    #[must_use]
    pub fn is_stale_element(&self) -> bool {
        matches!(self, Self::Response(err) if err.is_stale_element())
    }
}

// ============================================================================
// TransportError
// ============================================================================

/// Category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Nothing is listening on the target address.
    ConnectionRefused,
    /// The transport gave up waiting.
    Timeout,
    /// Any other connection-level failure.
    Other,
}

/// Connection-level failure raised by a [`Transport`](crate::transport::Transport).
///
/// The message is optional because some transports fail without one;
/// the error translator has a dedicated rule for that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: Option<String>,
}

impl TransportError {
    /// Creates a transport error.
    #[inline]
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: Option<String>) -> Self {
        Self { kind, message }
    }

    /// Creates a connection refused error.
    #[inline]
    #[must_use]
    pub fn connection_refused(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::ConnectionRefused, Some(message.into()))
    }

    /// Creates a generic transport error carrying `message`.
    #[inline]
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, Some(message.into()))
    }

    /// Returns the failure category.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the failure message, if any.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns `true` if the connection was refused.
    #[inline]
    #[must_use]
    pub fn is_connection_refused(&self) -> bool {
        self.kind == TransportErrorKind::ConnectionRefused
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.kind) {
            (Some(message), _) => f.write_str(message),
            (None, TransportErrorKind::ConnectionRefused) => f.write_str("connection refused"),
            (None, TransportErrorKind::Timeout) => f.write_str("request timed out"),
            (None, TransportErrorKind::Other) => f.write_str("transport failure"),
        }
    }
}

impl StdError for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if refused_connection(&err) {
            TransportErrorKind::ConnectionRefused
        } else if err.is_timeout() {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Other
        };

        Self::new(kind, Some(err.to_string()))
    }
}

/// Walks the source chain looking for an OS-level refused connection.
fn refused_connection(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>()
            && io.kind() == IoErrorKind::ConnectionRefused
        {
            return true;
        }
        source = current.source();
    }
    false
}

// ============================================================================
// ResponseError
// ============================================================================

/// Structured error extracted from a failed response body.
///
/// `kind` carries the protocol error code (e.g. `"no such element"`)
/// when the remote end supplied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    message: String,
    kind: Option<String>,
}

impl ResponseError {
    /// Creates a response error without a kind tag.
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }

    /// Sets the kind tag.
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind tag, if any.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns `true` if this describes a stale element reference.
    #[inline]
    #[must_use]
    pub fn is_stale_element(&self) -> bool {
        self.kind() == Some("stale element reference")
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{kind}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for ResponseError {}

// ============================================================================
// Tests
// ============================================================================
