//! Session state and resolved session data.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::driver::{ConnectionParams, SessionParams};
use crate::identifiers::SessionId;
use crate::protocol::capabilities::CapabilityRequest;
use crate::surface::{CommandSurface, FeatureFlags};

// ============================================================================
// SessionState
// ============================================================================

/// Lifecycle state of a [`Session`](super::Session).
///
/// ```text
/// Idle ──start──► Requesting ──ok──► Established ──deleteSession──► Idle
///                      │                  │
///                      └──err──► Failed   └──reload──► Requesting
/// ```
///
/// `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session exists.
    #[default]
    Idle,
    /// A session-creation request is outstanding.
    Requesting,
    /// A session exists on the remote end.
    Established,
    /// Session creation failed.
    Failed,
}

impl SessionState {
    /// Returns the state name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Requesting => "Requesting",
            Self::Established => "Established",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SessionDescriptor
// ============================================================================

/// Resolved session data.
///
/// Immutable once published; a session swaps in a new descriptor instead
/// of updating fields, so readers never observe a partial update.
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    /// Server-assigned identifier; `None` until a session exists.
    pub session_id: Option<SessionId>,
    /// Resolved capabilities, or the requested ones before creation.
    pub capabilities: Value,
    /// Negotiated request, retained for reloads.
    pub requested: Option<CapabilityRequest>,
    /// Where the session is reached.
    pub connection: ConnectionParams,
    /// Commands callable on the session.
    pub surface: Arc<CommandSurface>,
}

impl SessionDescriptor {
    /// Descriptor of a session that does not exist yet.
    #[must_use]
    pub fn pending(params: &SessionParams) -> Self {
        Self {
            session_id: None,
            capabilities: params.capabilities.clone(),
            requested: params.requested_capabilities.clone(),
            connection: params.connection.clone(),
            surface: Arc::new(CommandSurface::default()),
        }
    }

    /// Descriptor of an established session.
    ///
    /// Detects the session's feature flags and builds its command surface.
    #[must_use]
    pub fn established(session_id: SessionId, params: &SessionParams) -> Self {
        let requested_legacy = params
            .requested_capabilities
            .as_ref()
            .map_or(&params.capabilities, CapabilityRequest::legacy);
        let flags = FeatureFlags::detect(&params.capabilities, requested_legacy);

        Self {
            session_id: Some(session_id),
            capabilities: params.capabilities.clone(),
            requested: params.requested_capabilities.clone(),
            connection: params.connection.clone(),
            surface: Arc::new(crate::surface::build_command_surface(&flags)),
        }
    }

    /// Copy of this descriptor without a session id or commands.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            session_id: None,
            surface: Arc::new(CommandSurface::default()),
            ..self.clone()
        }
    }

    /// Feature flags the command surface was built for.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &FeatureFlags {
        self.surface.flags()
    }
}

// ============================================================================
// Tests
// ============================================================================
