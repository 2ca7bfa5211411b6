//! Remote WebDriver client core.
//!
//! This library negotiates sessions with WebDriver remote ends (browser
//! drivers, Selenium grids, Appium servers, cloud vendors), classifies
//! their replies across protocol generations, and assembles the set of
//! commands a session supports from layered protocol tables.
//!
//! # Architecture
//!
//! ```text
//! SessionParams ──► start_session ──► Transport ──► remote end
//!                        │   ▲
//!            negotiate ──┘   └── classify / to_error / diagnose
//!                        │
//!                        ▼
//!            FeatureFlags::detect ──► build_command_surface ──► Session::call
//! ```
//!
//! Key design principles:
//!
//! - Capabilities are requested in both dialects at once
//! - Reply classification never fails; errors are raised one layer up
//! - Protocol tables are static data folded in a fixed precedence order
//! - Session data is published as immutable snapshots
//!
//! # Quick Start
//!
//! ```no_run
//! use serde_json::json;
//! use webdriver_remote::{Result, Session, SessionParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let params = SessionParams::builder()
//!         .url("http://localhost:9515/")
//!         .capability("browserName", json!("chrome"))
//!         .build()?;
//!
//!     let session = Session::connect(params).await?;
//!     session.call("navigateTo", vec![json!("https://example.com")]).await?;
//!
//!     let title = session.call("getTitle", vec![]).await?;
//!     println!("Page title: {:?}", title.into_value());
//!
//!     session.call("deleteSession", vec![]).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`diagnostics`] | Failure → actionable message |
//! | [`driver`] | Connection and session parameters |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Capabilities, reply classification, protocol tables |
//! | [`session`] | Session lifecycle and command execution |
//! | [`surface`] | Capability-conditioned command surface |
//! | [`transport`] | HTTP transport |

// ============================================================================
// Modules
// ============================================================================

/// Translation of failures into actionable diagnostics.
pub mod diagnostics;

/// Connection and session parameters.
///
/// Use [`SessionParams::builder()`] to create validated parameters.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Wire protocol data: capabilities, replies and command tables.
pub mod protocol;

/// Session lifecycle coordinator.
pub mod session;

/// Capability-conditioned command surface.
pub mod surface;

/// HTTP transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Diagnostics
pub use diagnostics::{diagnose, to_error};

// Configuration types
pub use driver::{ConnectionParams, SessionParams, SessionParamsBuilder};

// Error types
pub use error::{Error, ResponseError, Result, TransportError, TransportErrorKind};

// Identifier types
pub use identifiers::SessionId;

// Protocol types
pub use protocol::{CapabilityRequest, ResponseOutcome, negotiate};
pub use protocol::classify as classify_response;

// Session types
pub use session::{CommandReply, Session, SessionDescriptor, SessionState, start_session};

// Command surface types
pub use surface::{CommandBinding, CommandSurface, Dialect, FeatureFlags, build_command_surface};

// Transport types
pub use transport::{HttpReply, HttpTransport, Transport};
