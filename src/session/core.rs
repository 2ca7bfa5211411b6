//! Session handle and command execution.
//!
//! A [`Session`] owns the lifecycle state machine and the currently
//! published [`SessionDescriptor`]. Commands are looked up on the
//! descriptor's command surface, prepared, sent and classified.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use webdriver_remote::{HttpTransport, Session, SessionParams};
//!
//! # async fn example() -> webdriver_remote::Result<()> {
//! let params = SessionParams::builder()
//!     .url("http://localhost:9515/")
//!     .capability("browserName", json!("chrome"))
//!     .build()?;
//!
//! let session = Session::new(HttpTransport::new()?, params);
//! session.start().await?;
//! session.call("navigateTo", vec![json!("https://example.com")]).await?;
//! let title = session.call("getTitle", vec![]).await?;
//! println!("{:?}", title.into_value());
//! session.call("deleteSession", vec![]).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, warn};

use crate::diagnostics::to_error;
use crate::driver::{ConnectionParams, SessionParams};
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::response::{ResponseOutcome, classify};
use crate::surface::CommandSurface;
use crate::transport::{HttpTransport, Transport};

use super::descriptor::{SessionDescriptor, SessionState};
use super::start::{create_session, start_session};

// ============================================================================
// Constants
// ============================================================================

/// Command that ends the session on success.
const DELETE_SESSION: &str = "deleteSession";

// ============================================================================
// CommandReply
// ============================================================================

/// Reply of a successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    /// The reply's `value` field.
    Value(Value),
    /// An element lookup found nothing yet.
    ElementMissing,
}

impl CommandReply {
    /// Returns the value, or `None` for a missing element.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::ElementMissing => None,
        }
    }

    /// Consumes the reply and returns the value, or `None` for a missing element.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::ElementMissing => None,
        }
    }

    /// Returns `true` if an element lookup found nothing.
    #[inline]
    #[must_use]
    pub fn is_element_missing(&self) -> bool {
        matches!(self, Self::ElementMissing)
    }
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a session.
pub(crate) struct SessionInner<T> {
    /// Transport used for every request.
    transport: T,
    /// Caller-supplied parameters, updated by session creation.
    params: Mutex<SessionParams>,
    /// Connection the session was configured with, before any direct-connect rewrite.
    origin: ConnectionParams,
    /// Lifecycle state.
    state: Mutex<SessionState>,
    /// Published descriptor; replaced wholesale, never mutated.
    descriptor: RwLock<Arc<SessionDescriptor>>,
}

// ============================================================================
// Session
// ============================================================================

/// A remote WebDriver session.
///
/// Cloning is cheap; clones share the same session.
pub struct Session<T: Transport = HttpTransport> {
    inner: Arc<SessionInner<T>>,
}

impl<T: Transport> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// ============================================================================
// Session - Display
// ============================================================================

impl<T: Transport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor();
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("session_id", &descriptor.session_id)
            .field("connection", &descriptor.connection.to_string())
            .field("commands", &descriptor.surface.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Lifecycle
// ============================================================================

impl Session<HttpTransport> {
    /// Creates an HTTP session and starts it.
    ///
    /// # Errors
    ///
    /// See [`Session::start`].
    pub async fn connect(params: SessionParams) -> Result<Self> {
        let session = Self::new(HttpTransport::new()?, params);
        session.start().await?;
        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    /// Creates an idle session.
    #[must_use]
    pub fn new(transport: T, params: SessionParams) -> Self {
        let descriptor = SessionDescriptor::pending(&params);
        Self::from_parts(transport, params, SessionState::Idle, descriptor)
    }

    /// Adopts a session that already runs on the remote end.
    ///
    /// No request is sent; `params.capabilities` are taken as the resolved
    /// capabilities of the session.
    #[must_use]
    pub fn attach(transport: T, params: SessionParams, session_id: SessionId) -> Self {
        debug!(session_id = %session_id, "Attaching to existing session");
        let descriptor = SessionDescriptor::established(session_id, &params);
        Self::from_parts(transport, params, SessionState::Established, descriptor)
    }

    fn from_parts(
        transport: T,
        params: SessionParams,
        state: SessionState,
        descriptor: SessionDescriptor,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport,
                origin: params.connection.clone(),
                params: Mutex::new(params),
                state: Mutex::new(state),
                descriptor: RwLock::new(Arc::new(descriptor)),
            }),
        }
    }

    /// Creates the session on the remote end.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the session is `Idle`
    /// - [`Error::SessionCreation`] / [`Error::MalformedBody`] if creation fails;
    ///   the session is then `Failed`
    pub async fn start(&self) -> Result<SessionId> {
        self.transition(SessionState::Idle, SessionState::Requesting)?;

        let mut params = self.inner.params.lock().clone();
        match start_session(&self.inner.transport, &mut params).await {
            Ok(session_id) => {
                self.establish(session_id.clone(), params);
                Ok(session_id)
            }
            Err(err) => {
                self.set_state(SessionState::Failed);
                Err(err)
            }
        }
    }

    /// Replaces the session with an equivalent new one.
    ///
    /// The old session is deleted on a best-effort basis, then the retained
    /// capability request is sent again.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the session is `Established`
    /// - [`Error::SessionCreation`] / [`Error::MalformedBody`] if creation fails;
    ///   the session is then `Failed`
    pub async fn reload(&self) -> Result<SessionId> {
        self.transition(SessionState::Established, SessionState::Requesting)?;

        let descriptor = self.descriptor();
        self.delete_quietly(&descriptor).await;

        let mut params = self.inner.params.lock().clone();
        let request = descriptor
            .requested
            .clone()
            .unwrap_or_else(|| crate::protocol::negotiate(&params.capabilities));

        match create_session(&self.inner.transport, &descriptor.connection, &request).await {
            Ok(created) => {
                params.requested_capabilities = Some(request);
                params.capabilities = created.capabilities;
                params.connection = created.connection;
                self.establish(created.session_id.clone(), params);
                Ok(created.session_id)
            }
            Err(err) => {
                // The old session is already gone.
                *self.inner.descriptor.write() = Arc::new(descriptor.cleared());
                self.set_state(SessionState::Failed);
                Err(err)
            }
        }
    }

    /// Sends `deleteSession` for the old session, logging failures.
    async fn delete_quietly(&self, descriptor: &SessionDescriptor) {
        let Some(binding) = descriptor.surface.get(DELETE_SESSION) else {
            return;
        };
        let result = match binding.prepare(descriptor.session_id.as_ref(), &[]) {
            Ok(request) => self
                .inner
                .transport
                .send(&descriptor.connection, &request)
                .await
                .map(drop)
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            warn!(error = %err, "Failed to delete session before reload");
        }
    }

    /// Records a created session and publishes its descriptor.
    fn establish(&self, session_id: SessionId, params: SessionParams) {
        let descriptor = SessionDescriptor::established(session_id, &params);
        debug!(
            commands = descriptor.surface.len(),
            flags = ?descriptor.flags(),
            "Command surface built"
        );

        *self.inner.params.lock() = params;
        *self.inner.descriptor.write() = Arc::new(descriptor);
        self.set_state(SessionState::Established);
    }
}

// ============================================================================
// Session - Accessors
// ============================================================================

impl<T: Transport> Session<T> {
    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.inner.state.lock()
    }

    /// Returns the currently published descriptor.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> Arc<SessionDescriptor> {
        Arc::clone(&*self.inner.descriptor.read())
    }

    /// Returns the session id, if a session exists.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.descriptor().session_id.clone()
    }

    /// Returns the command surface.
    #[must_use]
    pub fn surface(&self) -> Arc<CommandSurface> {
        Arc::clone(&self.descriptor().surface)
    }

    /// Returns a copy of the session parameters.
    #[must_use]
    pub fn params(&self) -> SessionParams {
        self.inner.params.lock().clone()
    }

    /// Returns the transport.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }
}

// ============================================================================
// Session - Commands
// ============================================================================

impl<T: Transport> Session<T> {
    /// Executes the command `name` with positional `args`.
    ///
    /// URL variables come first, then body parameters in declaration order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the session is `Established`
    /// - [`Error::UnknownCommand`] if the session has no such command
    /// - [`Error::InvalidArgument`] if `args` do not fit the command
    /// - [`Error::Transport`] if the request could not be sent
    /// - [`Error::Response`] if the remote end reported a failure
    pub async fn call(&self, name: &str, args: Vec<Value>) -> Result<CommandReply> {
        let state = self.state();
        if state != SessionState::Established {
            return Err(Error::invalid_state(
                SessionState::Established.as_str(),
                state.as_str(),
            ));
        }

        let descriptor = self.descriptor();
        let binding = descriptor
            .surface
            .get(name)
            .ok_or_else(|| Error::unknown_command(name))?;

        let request = binding.prepare(descriptor.session_id.as_ref(), &args)?;
        debug!(command = name, method = %request.method, path = %request.path, "Executing command");

        let reply = self
            .inner
            .transport
            .send(&descriptor.connection, &request)
            .await?;

        let body = reply.body.as_ref();
        match classify(reply.status, body) {
            ResponseOutcome::Success => {
                if name == DELETE_SESSION {
                    self.end(&descriptor);
                }
                let value = body
                    .and_then(|b| b.get("value"))
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(CommandReply::Value(value))
            }
            ResponseOutcome::ElementMissing => Ok(CommandReply::ElementMissing),
            ResponseOutcome::Failure(reason) => {
                debug!(command = name, %reason, "Command failed");
                Err(to_error(body).into())
            }
        }
    }

    /// Returns to `Idle` after the session was deleted.
    ///
    /// The structured request replaces the resolved capabilities and the
    /// configured connection replaces any direct-connect target, so a later
    /// [`start`](Self::start) sends the same request to the same endpoint.
    fn end(&self, descriptor: &SessionDescriptor) {
        debug!(session_id = ?descriptor.session_id, "Session deleted");
        let pending = {
            let mut params = self.inner.params.lock();
            if let Some(request) = params.requested_capabilities.take() {
                params.capabilities = request.w3c().clone();
            }
            params.connection = self.inner.origin.clone();
            SessionDescriptor::pending(&params)
        };
        *self.inner.descriptor.write() = Arc::new(pending);
        self.set_state(SessionState::Idle);
    }
}

// ============================================================================
// Session - State Machine
// ============================================================================

impl<T: Transport> Session<T> {
    fn transition(&self, from: SessionState, to: SessionState) -> Result<()> {
        let mut state = self.inner.state.lock();
        if *state != from {
            return Err(Error::invalid_state(from.as_str(), state.as_str()));
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: SessionState) {
        *self.inner.state.lock() = to;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::error::TransportError;
    use crate::protocol::command::HttpMethod;
    use crate::transport::mock::MockTransport;

    fn created(id: &str) -> Option<Value> {
        Some(json!({
            "value": {
                "sessionId": id,
                "capabilities": {
                    "browserName": "chrome",
                    "browserVersion": "120.0",
                    "platformName": "linux",
                    "setWindowRect": true
                }
            }
        }))
    }

    fn params() -> SessionParams {
        SessionParams::new(json!({ "browserName": "chrome" }))
    }

    async fn started(transport: MockTransport) -> Session<MockTransport> {
        let session = Session::new(transport, params());
        session.start().await.expect("start");
        session
    }

    #[tokio::test]
    async fn test_start_establishes_session() {
        let session = Session::new(MockTransport::new().reply(200, created("abc123")), params());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.surface().is_empty());

        let id = session.start().await.expect("start");

        assert_eq!(id.as_str(), "abc123");
        assert_eq!(session.state(), SessionState::Established);
        assert_eq!(session.session_id(), Some(id));
        assert!(session.surface().contains("navigateTo"));
        assert!(session.params().requested_capabilities.is_some());
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let session = started(MockTransport::new().reply(200, created("abc123"))).await;

        let err = session.start().await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                expected: "Idle",
                found: "Established"
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_start_is_terminal() {
        let transport = MockTransport::new()
            .fail(TransportError::connection_refused("refused"))
            .reply(200, created("never"));
        let session = Session::new(transport, params());

        let err = session.start().await.unwrap_err();
        assert!(matches!(err, Error::SessionCreation { .. }));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.session_id().is_none());
        assert!(session.params().requested_capabilities.is_none());

        assert!(matches!(session.start().await, Err(Error::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_call_sends_prepared_request() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": null })));
        let session = started(transport).await;

        let reply = session
            .call("navigateTo", vec![json!("https://example.com")])
            .await
            .expect("call");
        assert_eq!(reply, CommandReply::Value(Value::Null));

        let sent = session.transport().requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].method, HttpMethod::Post);
        assert_eq!(sent[1].path, "/session/abc123/url");
        assert_eq!(sent[1].body, Some(json!({ "url": "https://example.com" })));
    }

    #[tokio::test]
    async fn test_call_returns_value() -> anyhow::Result<()> {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": "Example Domain" })));
        let session = Session::new(transport, params());
        session.start().await?;

        let reply = session.call("getTitle", vec![]).await?;
        assert_eq!(reply.into_value(), Some(json!("Example Domain")));
        Ok(())
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::new(MockTransport::new().reply(200, created("abc123")), params());
        let clone = session.clone();

        tokio_test::assert_ok!(tokio_test::block_on(session.start()));
        assert_eq!(clone.state(), SessionState::Established);
        assert_eq!(clone.session_id(), session.session_id());
    }

    #[tokio::test]
    async fn test_call_tolerates_missing_element() {
        let transport = MockTransport::new().reply(200, created("abc123")).reply(
            404,
            Some(json!({ "value": { "error": "no such element", "message": "not found" } })),
        );
        let session = started(transport).await;

        let reply = session
            .call("findElement", vec![json!("css selector"), json!("#missing")])
            .await
            .expect("call");
        assert!(reply.is_element_missing());
        assert_eq!(reply.value(), None);
    }

    #[tokio::test]
    async fn test_call_failure_is_response_error() {
        let transport = MockTransport::new().reply(200, created("abc123")).reply(
            404,
            Some(json!({ "value": { "error": "no such window", "message": "window closed" } })),
        );
        let session = started(transport).await;

        let err = session.call("getTitle", vec![]).await.unwrap_err();
        match err {
            Error::Response(response) => {
                assert_eq!(response.kind(), Some("no such window"));
                assert_eq!(response.message(), "window closed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_transport_failure() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .fail(TransportError::other("socket hang up"));
        let session = started(transport).await;

        let err = session.call("getTitle", vec![]).await.unwrap_err();
        assert!(err.is_transport_error());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let session = started(MockTransport::new().reply(200, created("abc123"))).await;

        let err = session.call("installAddOn", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { .. }));
    }

    #[tokio::test]
    async fn test_invalid_arguments_send_nothing() {
        let session = started(MockTransport::new().reply(200, created("abc123"))).await;

        let err = session.call("navigateTo", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(session.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_session_returns_to_idle() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": null })))
            .reply(200, created("def456"));
        let session = started(transport).await;

        session.call("deleteSession", vec![]).await.expect("delete");

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.session_id().is_none());
        assert!(session.surface().is_empty());

        let sent = session.transport().requests();
        assert_eq!(sent[1].method, HttpMethod::Delete);
        assert_eq!(sent[1].path, "/session/abc123");

        let id = session.start().await.expect("restart");
        assert_eq!(id.as_str(), "def456");

        let sent = session.transport().requests();
        assert_eq!(sent[2].body, sent[0].body);
    }

    #[tokio::test]
    async fn test_reload_replays_request() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": null })))
            .reply(200, created("def456"));
        let session = started(transport).await;
        let first_request = session.descriptor().requested.clone();

        let id = session.reload().await.expect("reload");

        assert_eq!(id.as_str(), "def456");
        assert_eq!(session.state(), SessionState::Established);
        assert_eq!(session.descriptor().requested, first_request);

        let sent = session.transport().requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].path, "/session/abc123");
        assert_eq!(sent[2].path, "/session");
        assert_eq!(sent[2].body, sent[0].body);
    }

    #[tokio::test]
    async fn test_failed_reload_clears_session() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": null })))
            .fail(TransportError::connection_refused("refused"))
            .reply(200, Some(json!({ "value": "stale title" })));
        let session = started(transport).await;

        let err = session.reload().await.unwrap_err();
        assert!(matches!(err, Error::SessionCreation { .. }));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.session_id().is_none());
        assert!(session.surface().is_empty());

        let err = session.call("getTitle", vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidState {
                expected: "Established",
                found: "Failed"
            }
        ));
        assert_eq!(session.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_call_requires_established() {
        let session = Session::new(MockTransport::new(), params());

        let err = session.call("getTitle", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState { found: "Idle", .. }));
        assert!(session.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_session_restores_configured_connection() {
        let redirected = Some(json!({
            "value": {
                "sessionId": "abc123",
                "capabilities": {
                    "browserName": "chrome",
                    "directConnectProtocol": "https",
                    "directConnectHost": "node.example.com",
                    "directConnectPort": 443,
                    "directConnectPath": "/wd/hub"
                }
            }
        }));
        let transport = MockTransport::new()
            .reply(200, redirected)
            .reply(200, Some(json!({ "value": null })))
            .reply(200, created("def456"));
        let session = started(transport).await;
        let configured = params().connection;

        assert_eq!(session.descriptor().connection.hostname, "node.example.com");

        session.call("deleteSession", vec![]).await.expect("delete");
        assert_eq!(session.params().connection, configured);
        assert_eq!(session.descriptor().connection, configured);

        session.start().await.expect("restart");

        let sent = session.transport().requests();
        assert_eq!(sent[1].connection.hostname, "node.example.com");
        assert_eq!(sent[2].connection, configured);
        assert_eq!(sent[2].path, "/session");
    }

    #[tokio::test]
    async fn test_reload_requires_established() {
        let session = Session::new(MockTransport::new(), params());
        assert!(matches!(session.reload().await, Err(Error::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_attach_skips_creation() {
        let params = SessionParams::new(json!({
            "browserName": "firefox",
            "moz:firefoxOptions": {}
        }));
        let id = SessionId::new("existing").expect("id");
        let session = Session::attach(MockTransport::new(), params, id.clone());

        assert_eq!(session.state(), SessionState::Established);
        assert_eq!(session.session_id(), Some(id));
        assert!(session.surface().contains("installAddOn"));
        assert!(session.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_descriptor_snapshot_is_stable() {
        let transport = MockTransport::new()
            .reply(200, created("abc123"))
            .reply(200, Some(json!({ "value": null })));
        let session = started(transport).await;

        let snapshot = session.descriptor();
        session.call("deleteSession", vec![]).await.expect("delete");

        assert_eq!(snapshot.session_id.as_ref().map(SessionId::as_str), Some("abc123"));
        assert!(session.session_id().is_none());
    }
}
