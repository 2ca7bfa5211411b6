//! Type-safe identifiers.
//!
//! Newtype wrappers prevent mixing a session id with arbitrary strings.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// SessionId
// ============================================================================

/// Server-assigned session identifier.
///
/// Opaque to the client; never modified once assigned. Deserialization
/// applies the same non-empty check as [`SessionId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw identifier, rejecting empty strings.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.is_empty()).then_some(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| Error::invalid_argument("Session id must not be empty"))
    }
}

impl From<SessionId> for String {
    #[inline]
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_rejects_empty() {
        assert!(SessionId::new("").is_none());
        assert_eq!(SessionId::new("abc123").map(|id| id.to_string()), Some("abc123".into()));
    }

    #[test]
    fn test_session_id_serializes_transparently() {
        let id = SessionId::new("abc123").expect("valid id");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"abc123\"");
    }

    #[test]
    fn test_session_id_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());

        let id: SessionId = serde_json::from_str("\"abc123\"").expect("deserialize");
        assert_eq!(id.as_str(), "abc123");
    }
}
