//! Wire protocol data.
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `capabilities` | Dual-dialect capability negotiation and new-session replies |
//! | `command` | Command descriptors and protocol table types |
//! | `response` | Reply classification |
//! | `tables` | Static protocol command tables |

// ============================================================================
// Submodules
// ============================================================================

/// Capability negotiation.
pub mod capabilities;

/// Command descriptors and protocol tables.
pub mod command;

/// Reply classification.
pub mod response;

/// Static protocol command tables.
pub mod tables;

// ============================================================================
// Re-exports
// ============================================================================

pub use capabilities::{CapabilityRequest, NewSessionResponse, negotiate};
pub use command::{CommandDescriptor, Endpoint, HttpMethod, Parameter, ProtocolCommandTable};
pub use response::{FailureReason, ResponseOutcome, classify};
