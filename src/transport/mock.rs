//! Scripted in-memory transport.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::driver::ConnectionParams;
use crate::error::TransportError;
use crate::protocol::command::HttpMethod;
use crate::surface::PreparedRequest;

use super::{HttpReply, Transport};

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub connection: ConnectionParams,
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub is_hub_command: bool,
}

/// Replays queued replies in order and records every request.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    pub fn reply(self, status: u16, body: Option<Value>) -> Self {
        self.replies.lock().push_back(Ok(HttpReply::new(status, body)));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        connection: &ConnectionParams,
        request: &PreparedRequest,
    ) -> Result<HttpReply, TransportError> {
        self.requests.lock().push(RecordedRequest {
            connection: connection.clone(),
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            is_hub_command: request.is_hub_command,
        });

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::other("no scripted reply")))
    }
}
