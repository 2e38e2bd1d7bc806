//! The engine's two I/O seams and their in-memory mocks.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;

/// Lifecycle of the duplex socket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Initial handshake in progress.
    Connecting,
    /// Socket is up and validated.
    Connected,
    /// Socket dropped; a reconnect attempt is underway.
    Reconnecting,
    /// No socket and none being established.
    Disconnected,
}

/// Outbound half of the duplex socket.
///
/// Implementations carry an already-encoded frame; the engine never
/// hands them raw payloads.
pub trait SocketTransport: Send + Sync {
    /// Transmits one frame.
    fn send(&self, frame: String) -> impl Future<Output = SyncResult<()>> + Send;
}

/// The server's JSON POST endpoints, one per wire command.
pub trait ApiClient: Send + Sync {
    /// Issues one command and returns the raw response body.
    ///
    /// The body still carries the server's `{ success | error }`
    /// envelope; the action layer unwraps it.
    fn call(
        &self,
        endpoint: &str,
        request: serde_json::Value,
    ) -> impl Future<Output = SyncResult<serde_json::Value>> + Send;
}

/// A `SocketTransport` that records frames instead of sending them.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<SyncError>>,
}

impl MockTransport {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a failure for the next send.
    pub fn fail_next(&self, error: SyncError) {
        self.failures.lock().push_back(error);
    }

    /// Every frame sent so far, in order.
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// The last sent frame, decoded as JSON.
    pub fn last_frame_json(&self) -> Option<serde_json::Value> {
        let sent = self.sent.lock();
        sent.last().and_then(|frame| serde_json::from_str(frame).ok())
    }
}

impl SocketTransport for MockTransport {
    async fn send(&self, frame: String) -> SyncResult<()> {
        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }
        self.sent.lock().push(frame);
        Ok(())
    }
}

/// An `ApiClient` that replays scripted responses.
#[derive(Default)]
pub struct MockApiClient {
    responses: Mutex<VecDeque<SyncResult<serde_json::Value>>>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockApiClient {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next response, applied in FIFO order.
    pub fn push_response(&self, response: SyncResult<serde_json::Value>) {
        self.responses.lock().push_back(response);
    }

    /// Every `(endpoint, request)` pair issued so far.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().clone()
    }
}

impl ApiClient for MockApiClient {
    async fn call(
        &self,
        endpoint: &str,
        request: serde_json::Value,
    ) -> SyncResult<serde_json::Value> {
        self.calls.lock().push((endpoint.to_string(), request));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::transport("no scripted response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transport_records_and_fails() {
        let transport = MockTransport::new();
        transport.send("{\"type\":3}".to_string()).await.unwrap();
        assert_eq!(transport.sent_frames(), vec!["{\"type\":3}".to_string()]);

        transport.fail_next(SyncError::transport("socket closed"));
        let result = transport.send("{}".to_string()).await;
        assert!(matches!(result, Err(SyncError::Transport { .. })));
        // The failed frame is never recorded.
        assert_eq!(transport.sent_frames().len(), 1);
    }

    #[tokio::test]
    async fn mock_api_client_replays_in_order() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({ "success": true })));
        let value = client.call("update_activity", serde_json::json!({})).await.unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(client.calls()[0].0, "update_activity");

        let result = client.call("update_activity", serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
