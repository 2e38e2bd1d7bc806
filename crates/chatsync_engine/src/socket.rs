//! The socket facade: status, outbound frames, and response
//! correlation in one place.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::inflight::{fetch_response, InflightRequests};
use crate::transport::{ConnectionStatus, SocketTransport};
use chatsync_protocol::{
    ClientMessagePayload, ClientSocketMessage, ServerMessageType, ServerSocketMessage,
};
use parking_lot::Mutex;
use tracing::debug;

/// A duplex socket connection with correlated request/response
/// support.
///
/// The transport only carries frames; connection lifecycle is driven
/// from outside via [`set_status`](Self::set_status). Leaving
/// `Connected` bumps the generation and rejects everything inflight.
pub struct SyncSocket<T> {
    transport: T,
    config: SyncConfig,
    inflight: InflightRequests,
    status: Mutex<ConnectionStatus>,
}

impl<T: SocketTransport> SyncSocket<T> {
    /// Wraps a transport. The socket starts out `Disconnected`.
    pub fn new(transport: T, config: SyncConfig) -> Self {
        Self {
            transport,
            config,
            inflight: InflightRequests::new(),
            status: Mutex::new(ConnectionStatus::Disconnected),
        }
    }

    /// The engine configuration this socket runs under.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.lock()
    }

    /// Records a connection status transition.
    ///
    /// Leaving `Connected` invalidates all inflight requests; their
    /// waiters observe `ConnectionReset`.
    pub fn set_status(&self, status: ConnectionStatus) {
        let mut current = self.status.lock();
        if *current == status {
            return;
        }
        debug!(from = ?*current, to = ?status, "connection status change");
        let leaving_connected = *current == ConnectionStatus::Connected;
        *current = status;
        drop(current);
        if leaving_connected {
            self.inflight.reset(self.inflight.generation() + 1);
        }
    }

    /// Sends a frame without awaiting any response, returning its
    /// correlation ID.
    pub async fn send_message(&self, payload: ClientMessagePayload) -> SyncResult<u64> {
        if self.status() == ConnectionStatus::Disconnected {
            return Err(SyncError::NotConnected);
        }
        let (id, waiter) = self.inflight.register();
        // Fire-and-forget: nothing will await this waiter.
        self.inflight.abandon(waiter.id());
        let frame = ClientSocketMessage { id, payload }.encode()?;
        self.transport.send(frame).await?;
        Ok(id)
    }

    /// Sends a frame and awaits its correlated response of the
    /// expected kind.
    pub async fn call(
        &self,
        payload: ClientMessagePayload,
        expected: ServerMessageType,
    ) -> SyncResult<ServerSocketMessage> {
        if self.status() == ConnectionStatus::Disconnected {
            return Err(SyncError::NotConnected);
        }
        let (id, waiter) = self.inflight.register();
        let frame = ClientSocketMessage { id, payload }.encode()?;
        if let Err(error) = self.transport.send(frame).await {
            self.inflight.abandon(id);
            return Err(error);
        }
        fetch_response(&self.inflight, waiter, expected, self.config.response_timeout).await
    }

    /// Feeds an inbound frame through response correlation.
    ///
    /// Returns the frame back when it is unsolicited traffic the
    /// caller must dispatch (update envelopes, pushed requests);
    /// correlated responses are consumed here.
    pub fn handle_frame(&self, message: ServerSocketMessage) -> Option<ServerSocketMessage> {
        self.inflight.resolve(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::time::Duration;

    fn socket() -> SyncSocket<MockTransport> {
        let config = SyncConfig::default().with_response_timeout(Duration::from_millis(100));
        let socket = SyncSocket::new(MockTransport::new(), config);
        socket.set_status(ConnectionStatus::Connected);
        socket
    }

    #[tokio::test]
    async fn send_requires_a_connection() {
        let socket = SyncSocket::new(MockTransport::new(), SyncConfig::default());
        let result = socket.send_message(ClientMessagePayload::Ping).await;
        assert!(matches!(result, Err(SyncError::NotConnected)));
    }

    #[tokio::test]
    async fn frames_carry_increasing_ids() {
        let socket = socket();
        let first = socket
            .send_message(ClientMessagePayload::AckUpdates { current_as_of: 1 })
            .await
            .unwrap();
        let second = socket
            .send_message(ClientMessagePayload::AckUpdates { current_as_of: 2 })
            .await
            .unwrap();
        assert!(second > first);
        assert_eq!(socket.transport.sent_frames().len(), 2);
    }

    #[tokio::test]
    async fn leaving_connected_rejects_inflight() {
        let socket = std::sync::Arc::new(socket());
        let calling = {
            let socket = socket.clone();
            tokio::spawn(async move {
                socket
                    .call(ClientMessagePayload::Ping, ServerMessageType::Pong)
                    .await
            })
        };
        // Let the call register before dropping the connection.
        tokio::task::yield_now().await;
        socket.set_status(ConnectionStatus::Reconnecting);
        let result = calling.await.unwrap();
        assert!(matches!(result, Err(SyncError::ConnectionReset { .. })));
    }

    #[tokio::test]
    async fn pong_resolves_ping_call() {
        let socket = std::sync::Arc::new(socket());
        let calling = {
            let socket = socket.clone();
            tokio::spawn(async move {
                socket
                    .call(ClientMessagePayload::Ping, ServerMessageType::Pong)
                    .await
            })
        };
        tokio::task::yield_now().await;
        let frame = socket.transport.last_frame_json().unwrap();
        let id = frame["id"].as_u64().unwrap();
        assert!(socket
            .handle_frame(ServerSocketMessage::Pong { response_to: id })
            .is_none());
        let message = calling.await.unwrap().unwrap();
        assert_eq!(message.message_type(), ServerMessageType::Pong);
    }
}
