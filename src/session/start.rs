//! Session creation.
//!
//! One `POST /session` exchange carrying both capability dialects:
//!
//! ```text
//! negotiate ─► POST {path}/session ─► classify ─┬─ Success ─► extract id/caps ─► direct connect?
//!                     │                         └─ Failure ─► to_error ─► diagnose ─► SessionCreation
//!                     └─ TransportError ─────────────────────────────────► diagnose ─► SessionCreation
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, error, info};

use crate::diagnostics::{diagnose, to_error};
use crate::driver::{ConnectionParams, SessionParams};
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::capabilities::{CapabilityRequest, NewSessionResponse, negotiate};
use crate::protocol::command::HttpMethod;
use crate::protocol::response::classify;
use crate::surface::PreparedRequest;
use crate::transport::Transport;

// ============================================================================
// Constants
// ============================================================================

/// Session-creation endpoint, relative to the base path.
const NEW_SESSION_PATH: &str = "/session";

// ============================================================================
// NewSession
// ============================================================================

/// Outcome of a successful session-creation exchange.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub session_id: SessionId,
    pub capabilities: Value,
    /// Connection to use from now on; differs from the requested one after
    /// a direct-connect redirect.
    pub connection: ConnectionParams,
}

// ============================================================================
// start_session
// ============================================================================

/// Creates a session on the remote end described by `params`.
///
/// On success `params` gains the dual-form request and the resolved
/// capabilities, and its connection is rewritten if the server asked for
/// a direct connection. On failure `params` is left untouched.
///
/// # Errors
///
/// Returns [`Error::SessionCreation`] carrying a diagnostic for transport
/// failures and rejected replies, and [`Error::MalformedBody`] if an
/// accepted reply carries no session id.
pub async fn start_session<T>(transport: &T, params: &mut SessionParams) -> Result<SessionId>
where
    T: Transport + ?Sized,
{
    let request = negotiate(&params.capabilities);
    let created = create_session(transport, &params.connection, &request).await?;

    params.requested_capabilities = Some(request);
    params.capabilities = created.capabilities;
    params.connection = created.connection;

    Ok(created.session_id)
}

/// Issues the session-creation request for an already negotiated request.
pub(crate) async fn create_session<T>(
    transport: &T,
    connection: &ConnectionParams,
    request: &CapabilityRequest,
) -> Result<NewSession>
where
    T: Transport + ?Sized,
{
    let prepared = PreparedRequest {
        method: HttpMethod::Post,
        path: NEW_SESSION_PATH.to_string(),
        body: Some(request.session_payload()),
        is_hub_command: false,
    };

    debug!(%connection, "Requesting new session");

    let reply = match transport.send(connection, &prepared).await {
        Ok(reply) => reply,
        Err(err) => {
            let diagnostic = diagnose(&err, connection);
            error!(%connection, error = %err, "Session request failed");
            return Err(Error::session_creation(diagnostic));
        }
    };

    let body = reply.body.as_ref();
    // Only a clean success creates a session; a tolerated miss is still a failure here.
    if !classify(reply.status, body).is_success() {
        let err = to_error(body);
        let diagnostic = diagnose(&err, connection);
        error!(%connection, status = reply.status, error = %err, "Session request rejected");
        return Err(Error::session_creation(diagnostic));
    }

    let resolved = body
        .map(NewSessionResponse::from_body)
        .ok_or_else(|| Error::malformed_body("new session reply has no body"))?;
    let session_id = resolved
        .session_id
        .ok_or_else(|| Error::malformed_body("new session reply carries no session id"))?;

    let connection = match ConnectionParams::direct_connect(&resolved.capabilities) {
        Some(target) => {
            info!(from = %connection, to = %target, "Direct connect to new endpoint");
            target
        }
        None => connection.clone(),
    };

    info!(session_id = %session_id, "Session established");

    Ok(NewSession {
        session_id,
        capabilities: resolved.capabilities,
        connection,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::error::TransportError;
    use crate::transport::mock::MockTransport;

    fn chrome_params() -> SessionParams {
        SessionParams::new(json!({ "browserName": "chrome" }))
    }

    #[tokio::test]
    async fn test_start_session_w3c_envelope() {
        let transport = MockTransport::new().reply(
            200,
            Some(json!({
                "value": { "sessionId": "abc123", "capabilities": { "browserName": "chrome" } }
            })),
        );
        let mut params = chrome_params();

        let session_id = start_session(&transport, &mut params).await.expect("session");

        assert_eq!(session_id.as_str(), "abc123");
        assert_eq!(params.capabilities, json!({ "browserName": "chrome" }));

        let requested = params.requested_capabilities.as_ref().expect("recorded");
        assert_eq!(
            requested.w3c(),
            &json!({ "alwaysMatch": { "browserName": "chrome" }, "firstMatch": [{}] })
        );
        assert_eq!(requested.legacy(), &json!({ "browserName": "chrome" }));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].path, "/session");
        assert_eq!(
            sent[0].body,
            Some(json!({
                "capabilities": { "alwaysMatch": { "browserName": "chrome" }, "firstMatch": [{}] },
                "desiredCapabilities": { "browserName": "chrome" }
            }))
        );
    }

    #[tokio::test]
    async fn test_start_session_legacy_envelope() {
        let transport = MockTransport::new().reply(
            200,
            Some(json!({
                "sessionId": "legacy-1",
                "status": 0,
                "value": { "browserName": "firefox", "platform": "LINUX" }
            })),
        );
        let mut params = SessionParams::new(json!({ "browserName": "firefox" }));

        let session_id = start_session(&transport, &mut params).await.expect("session");

        assert_eq!(session_id.as_str(), "legacy-1");
        assert_eq!(params.capabilities["platform"], "LINUX");
    }

    #[tokio::test]
    async fn test_rejected_reply_leaves_params_untouched() {
        let transport = MockTransport::new().reply(
            500,
            Some(json!({
                "value": {
                    "error": "session not created",
                    "message": "Chrome version must be between 70 and 73"
                }
            })),
        );
        let mut params = chrome_params();
        let before = params.clone();

        let err = start_session(&transport, &mut params).await.unwrap_err();

        assert!(matches!(err, Error::SessionCreation { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Failed to create session.\n"));
        assert!(message.contains("Chrome version must be between 70 and 73"));
        assert_eq!(params, before);
    }

    #[tokio::test]
    async fn test_empty_body_gets_host_port_hint() {
        let transport = MockTransport::new().reply(200, None);
        let mut params = chrome_params();

        let err = start_session(&transport, &mut params).await.unwrap_err();

        assert!(err.to_string().contains("valid hostname:port"));
        assert!(params.requested_capabilities.is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_diagnostic() {
        let transport =
            MockTransport::new().fail(TransportError::connection_refused("connect ECONNREFUSED"));
        let mut params = chrome_params()
            .with_connection(ConnectionParams::new("http", "localhost", 9515, "/"));

        let err = start_session(&transport, &mut params).await.unwrap_err();

        assert!(matches!(err, Error::SessionCreation { .. }));
        assert!(err.to_string().contains("http://localhost:9515/"));
    }

    #[tokio::test]
    async fn test_missing_session_id_is_malformed() {
        let transport = MockTransport::new().reply(200, Some(json!({ "value": { "browserName": "chrome" } })));
        let mut params = chrome_params();

        let err = start_session(&transport, &mut params).await.unwrap_err();

        assert!(matches!(err, Error::MalformedBody { .. }));
        assert!(params.requested_capabilities.is_none());
    }

    #[tokio::test]
    async fn test_base_path_is_prefixed() {
        let transport = MockTransport::new().reply(
            200,
            Some(json!({ "value": { "sessionId": "s", "capabilities": {} } })),
        );
        let mut params = chrome_params()
            .with_connection(ConnectionParams::new("http", "grid", 4444, "/wd/hub"));

        start_session(&transport, &mut params).await.expect("session");

        let sent = transport.requests();
        assert_eq!(sent[0].connection.path, "/wd/hub");
        assert_eq!(sent[0].path, "/session");
    }

    #[tokio::test]
    async fn test_direct_connect_rewrites_connection() {
        let transport = MockTransport::new().reply(
            200,
            Some(json!({
                "value": {
                    "sessionId": "appium-1",
                    "capabilities": {
                        "platformName": "Android",
                        "directConnectProtocol": "https",
                        "directConnectHost": "node-7.example.com",
                        "directConnectPort": 443,
                        "directConnectPath": ""
                    }
                }
            })),
        );
        let mut params = SessionParams::new(json!({ "platformName": "Android" }));

        start_session(&transport, &mut params).await.expect("session");

        assert_eq!(
            params.connection,
            ConnectionParams::new("https", "node-7.example.com", 443, "")
        );
    }

    #[tokio::test]
    async fn test_partial_direct_connect_is_ignored() {
        let transport = MockTransport::new().reply(
            200,
            Some(json!({
                "value": {
                    "sessionId": "appium-2",
                    "capabilities": {
                        "directConnectProtocol": "https",
                        "directConnectHost": "node-7.example.com",
                        "directConnectPort": 443
                    }
                }
            })),
        );
        let mut params = chrome_params();

        start_session(&transport, &mut params).await.expect("session");

        assert_eq!(params.connection, ConnectionParams::default());
    }
}
