//! Remote end connection and session parameters.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConnectionParams`] | Protocol, host, port and base path of the remote end |
//! | [`SessionParams`] | Connection plus requested/resolved capabilities |
//! | [`SessionParamsBuilder`] | Fluent, validating builder |
//!
//! # Example
//!
//! ```
//! use webdriver_remote::driver::ConnectionParams;
//!
//! let connection = ConnectionParams::from_url("http://localhost:9515/").unwrap();
//! assert_eq!(connection.port, 9515);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for session parameters.
pub mod builder;

/// Connection and session parameter types.
pub mod params;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionParamsBuilder;
pub use params::{ConnectionParams, SessionParams, join_path};
