//! Session lifecycle.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`start_session`] | One-shot session creation on a parameters object |
//! | [`Session`] | Session handle: lifecycle, reload, command execution |
//! | [`SessionDescriptor`] | Resolved session data, published atomically |
//! | [`SessionState`] | `Idle` → `Requesting` → `Established` / `Failed` |
//! | [`CommandReply`] | Value of an executed command |

// ============================================================================
// Submodules
// ============================================================================

/// Session handle and command execution.
pub mod core;

/// Session state and descriptor.
pub mod descriptor;

/// Session creation.
pub mod start;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{CommandReply, Session};
pub use descriptor::{SessionDescriptor, SessionState};
pub use start::start_session;
