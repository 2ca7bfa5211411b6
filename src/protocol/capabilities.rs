//! Dual-dialect capability negotiation.
//!
//! A new-session request carries the same capability set twice: once in
//! the structured W3C shape (`alwaysMatch` + `firstMatch`) and once as the
//! flat legacy JSON Wire Protocol mapping. The server picks whichever it
//! understands and replies in either envelope.
//!
//! # Request Format
//!
//! ```json
//! {
//!   "capabilities": { "alwaysMatch": { ... }, "firstMatch": [{}] },
//!   "desiredCapabilities": { ... }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::identifiers::SessionId;

// ============================================================================
// CapabilityRequest
// ============================================================================

/// Requested capabilities in both protocol dialects.
///
/// Both forms describe the same logical capability set. Built once by
/// [`negotiate`] and retained so an equivalent session can be requested
/// again later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    /// Structured form: `{ alwaysMatch, firstMatch }`.
    #[serde(rename = "w3cCaps")]
    w3c: Value,

    /// Flat legacy form.
    #[serde(rename = "jsonwpCaps")]
    legacy: Value,
}

impl CapabilityRequest {
    /// Returns the structured (W3C) form.
    #[inline]
    #[must_use]
    pub fn w3c(&self) -> &Value {
        &self.w3c
    }

    /// Returns the flat legacy form.
    #[inline]
    #[must_use]
    pub fn legacy(&self) -> &Value {
        &self.legacy
    }

    /// Builds the body of a `POST /session` request.
    #[must_use]
    pub fn session_payload(&self) -> Value {
        json!({
            "capabilities": self.w3c,
            "desiredCapabilities": self.legacy,
        })
    }
}

/// Builds the dual-form request from caller-supplied capabilities.
///
/// Input carrying an `alwaysMatch` field is already structured and its
/// `alwaysMatch` object becomes the legacy form. Anything else is treated
/// as legacy and wrapped as `{ alwaysMatch: input, firstMatch: [{}] }`.
#[must_use]
pub fn negotiate(requested: &Value) -> CapabilityRequest {
    match requested.get("alwaysMatch").filter(|v| !v.is_null()) {
        Some(always_match) => CapabilityRequest {
            w3c: requested.clone(),
            legacy: always_match.clone(),
        },
        None => CapabilityRequest {
            w3c: json!({
                "alwaysMatch": requested,
                "firstMatch": [{}],
            }),
            legacy: requested.clone(),
        },
    }
}

// ============================================================================
// NewSessionResponse
// ============================================================================

/// Session identifier and capabilities extracted from a new-session reply.
///
/// # Envelopes
///
/// W3C:
/// ```json
/// { "value": { "sessionId": "abc", "capabilities": { ... } } }
/// ```
///
/// Legacy:
/// ```json
/// { "sessionId": "abc", "status": 0, "value": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionResponse {
    /// Resolved session identifier, if the server supplied one.
    pub session_id: Option<SessionId>,
    /// Resolved capabilities as returned by the server.
    pub capabilities: Value,
}

impl NewSessionResponse {
    /// Extracts session id and capabilities from either envelope.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let value = body.get("value").unwrap_or(&Value::Null);

        let session_id = string_field(value, "sessionId")
            .or_else(|| string_field(body, "sessionId"))
            .and_then(SessionId::new);

        let capabilities = value
            .get("capabilities")
            .filter(|caps| truthy(caps))
            .unwrap_or(value)
            .clone();

        Self {
            session_id,
            capabilities,
        }
    }

    /// Returns the resolved capabilities as an object map, if they are one.
    #[inline]
    #[must_use]
    pub fn capability_map(&self) -> Option<&Map<String, Value>> {
        self.capabilities.as_object()
    }
}

/// Returns a non-empty string field.
fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Loose truthiness used when probing optional envelope fields.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
