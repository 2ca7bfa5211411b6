//! Translation of failures into actionable messages.
//!
//! Two entry points:
//!
//! - [`to_error`] turns a failed response body into a [`ResponseError`].
//! - [`diagnose`] maps a failure to guidance for the most common
//!   misconfigurations (driver not running, wrong base path, ...).
//!
//! The diagnostic rules match literal phrases emitted by real driver
//! binaries. They are kept as an ordered table; the first matching rule
//! wins, so new rules must be inserted at the right precedence.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::driver::ConnectionParams;
use crate::error::{ResponseError, TransportError};
use crate::protocol::capabilities::truthy;

// ============================================================================
// Constants
// ============================================================================

/// Message of the error raised for an absent body.
pub const EMPTY_BODY_MESSAGE: &str = "Response has empty body";

/// Message when nothing better is known about a failure.
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Error kind inferred from stale-element messages.
const STALE_ELEMENT: &str = "stale element reference";

/// Help page a Selenium standalone server serves for unknown paths.
const SELENIUM_WRONG_PATH: &str = "Whoops! The URL specified routes to this help page.";

/// Replies of local drivers addressed under `/wd/hub`.
const BROWSER_DRIVER_ERRORS: &[&str] = &[
    // chromedriver
    "unknown command: wd/hub/session",
    // geckodriver
    "HTTP method not allowed",
    // safaridriver
    "'POST /wd/hub/session' was not found.",
    // iedriver
    "Command not found",
];

const W3C_CAPABILITY_HINT: &str = "\nMake sure to add vendor prefix like \"goog:\", \"appium:\", \"moz:\", etc to non W3C capabilities.\nSee more https://www.w3.org/TR/webdriver/#capabilities";

// ============================================================================
// Response Body → ResponseError
// ============================================================================

/// Builds a structured error from a failed response body.
#[must_use]
pub fn to_error(body: Option<&Value>) -> ResponseError {
    let Some(body) = body.filter(|b| truthy(b)) else {
        return ResponseError::new(EMPTY_BODY_MESSAGE);
    };

    if let Value::String(text) = body {
        return ResponseError::new(text.as_str());
    }

    let value = body.get("value").filter(|v| truthy(v));
    let has_error = body.get("error").is_some_and(truthy);
    if !body.is_object() || (value.is_none() && !has_error) {
        return ResponseError::new(UNKNOWN_ERROR_MESSAGE);
    }

    let error_obj = value.unwrap_or(body);
    let field = |key: &str| {
        error_obj
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let message = field("message")
        .or_else(|| field("class"))
        .unwrap_or(UNKNOWN_ERROR_MESSAGE);
    let error = ResponseError::new(message);

    match field("error") {
        Some(kind) => error.with_kind(kind),
        None if field("message").is_some_and(|m| m.contains(STALE_ELEMENT)) => {
            error.with_kind(STALE_ELEMENT)
        }
        None => error,
    }
}

// ============================================================================
// RequestFailure
// ============================================================================

/// A failure to diagnose: either transport-level or a rejected response.
#[derive(Debug, Clone, Copy)]
pub enum RequestFailure<'a> {
    /// Connection-level failure.
    Transport(&'a TransportError),
    /// Response classified as failure.
    Response(&'a ResponseError),
}

impl RequestFailure<'_> {
    /// Failure message, if any.
    fn message(&self) -> Option<&str> {
        let message = match self {
            Self::Transport(err) => err.message(),
            Self::Response(err) => Some(err.message()),
        };
        message.filter(|m| !m.is_empty())
    }

    fn is_connection_refused(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_connection_refused())
    }
}

impl<'a> From<&'a TransportError> for RequestFailure<'a> {
    fn from(err: &'a TransportError) -> Self {
        Self::Transport(err)
    }
}

impl<'a> From<&'a ResponseError> for RequestFailure<'a> {
    fn from(err: &'a ResponseError) -> Self {
        Self::Response(err)
    }
}

// ============================================================================
// Diagnostic Rules
// ============================================================================

/// Predicate → message template.
struct Rule {
    matches: fn(&RequestFailure<'_>) -> bool,
    render: fn(&RequestFailure<'_>, &ConnectionParams) -> String,
}

fn message_contains(failure: &RequestFailure<'_>, needle: &str) -> bool {
    failure.message().is_some_and(|m| m.contains(needle))
}

/// Rules in precedence order.
static RULES: &[Rule] = &[
    // Driver not started.
    Rule {
        matches: |f| f.is_connection_refused(),
        render: |_, connection| {
            format!(
                "Unable to connect to \"{connection}\", make sure browser driver is running on that address.\n\
                 If the driver is launched by a service, check its logs; it may have failed to start."
            )
        },
    },
    Rule {
        matches: |f| f.message() == Some("unhandled request"),
        render: |_, _| {
            "The browser driver couldn't start the session. Make sure you have set the \"path\" correctly!"
                .to_string()
        },
    },
    Rule {
        matches: |f| f.message().is_none(),
        render: |_, _| "See logs for more information.".to_string(),
    },
    // Wrong path: Selenium standalone.
    Rule {
        matches: |f| message_contains(f, SELENIUM_WRONG_PATH),
        render: |_, _| {
            "It seems you are running a Selenium Standalone server and point to a wrong path. \
             Please set `path: '/wd/hub'` in your configuration!"
                .to_string()
        },
    },
    // Wrong path: local drivers.
    Rule {
        matches: |f| BROWSER_DRIVER_ERRORS.iter().any(|m| message_contains(f, m)),
        render: |_, _| "Make sure to set `path: '/'` in your configuration!".to_string(),
    },
    // Driver bound to localhost rejecting the Host header.
    Rule {
        matches: |f| {
            message_contains(f, "Bad Request - Invalid Hostname")
                && message_contains(f, "HTTP Error 400")
        },
        render: |_, _| {
            "Run edge driver on 127.0.0.1 instead of localhost, ex: --host=127.0.0.1, \
             or set `hostname: 'localhost'` in your configuration"
                .to_string()
        },
    },
    // Illegal W3C capability passed to a Selenium standalone server.
    Rule {
        matches: |f| message_contains(f, "Illegal key values seen in w3c capabilities"),
        render: |f, _| format!("{}{W3C_CAPABILITY_HINT}", f.message().unwrap_or_default()),
    },
    // Wrong host/port, port in use, or illegal capability passed to a grid.
    Rule {
        matches: |f| f.message() == Some(EMPTY_BODY_MESSAGE),
        render: |_, _| {
            format!(
                "Make sure to connect to valid hostname:port or the port is not in use.\n\
                 If you use a grid server {W3C_CAPABILITY_HINT}"
            )
        },
    },
];

/// Maps a failure to an actionable diagnostic message.
///
/// Falls back to the raw failure message when no rule matches.
#[must_use]
pub fn diagnose<'a>(failure: impl Into<RequestFailure<'a>>, connection: &ConnectionParams) -> String {
    let failure = failure.into();

    RULES
        .iter()
        .find(|rule| (rule.matches)(&failure))
        .map(|rule| (rule.render)(&failure, connection))
        .unwrap_or_else(|| failure.message().unwrap_or_default().to_string())
}

// ============================================================================
// Tests
// ============================================================================
