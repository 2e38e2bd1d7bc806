//! Consumes the server's unsolicited update stream.

use crate::dispatch::{IntentDispatcher, StateIntent};
use crate::socket::SyncSocket;
use crate::transport::{ConnectionStatus, SocketTransport};
use chatsync_protocol::{
    convert_updates_payload, ClientMessagePayload, ConversionDirection, UpdatesPayload,
};
use tracing::debug;

/// Handles one inbound `Updates` envelope.
///
/// The envelope is converted to the client namespace, handed to the
/// dispatcher, and then acknowledged with its watermark — but only
/// while the socket is still `Connected`. The ack is fire-and-forget:
/// if it fails or is skipped, the server redelivers everything past
/// its recorded watermark on the next connection, and the store's
/// watermark check makes that redelivery harmless.
pub async fn handle_updates_payload<T: SocketTransport>(
    socket: &SyncSocket<T>,
    dispatcher: &dyn IntentDispatcher,
    payload: UpdatesPayload,
) {
    let payload = convert_updates_payload(ConversionDirection::ServerToClient, payload);
    let current_as_of = payload.updates_result.current_as_of;
    dispatcher.dispatch(StateIntent::ProcessUpdates {
        updates_result: payload.updates_result,
        user_infos: payload.user_infos,
    });

    if socket.status() != ConnectionStatus::Connected {
        debug!(current_as_of, "skipping update ack while not connected");
        return;
    }
    if let Err(error) = socket
        .send_message(ClientMessagePayload::AckUpdates { current_as_of })
        .await
    {
        debug!(%error, current_as_of, "update ack not delivered; redelivery will cover it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::dispatch::RecordingDispatcher;
    use crate::transport::MockTransport;
    use chatsync_protocol::{UpdatesResult, UserInfo};

    fn payload(current_as_of: u64) -> UpdatesPayload {
        UpdatesPayload {
            updates_result: UpdatesResult {
                new_updates: vec![],
                current_as_of,
            },
            user_infos: vec![UserInfo::new("85", "ashoat")],
        }
    }

    #[tokio::test]
    async fn dispatches_then_acks_watermark() {
        let socket = SyncSocket::new(MockTransport::new(), SyncConfig::default());
        socket.set_status(ConnectionStatus::Connected);
        let dispatcher = RecordingDispatcher::new();

        handle_updates_payload(&socket, &dispatcher, payload(1000)).await;

        let intents = dispatcher.intents();
        assert!(matches!(
            &intents[..],
            [StateIntent::ProcessUpdates { updates_result, .. }]
                if updates_result.current_as_of == 1000,
        ));

        let frame = socket.transport().last_frame_json().unwrap();
        assert_eq!(frame["type"], 4);
        assert_eq!(frame["payload"]["currentAsOf"], 1000);
    }

    #[tokio::test]
    async fn still_dispatches_but_skips_ack_when_disconnected() {
        let socket = SyncSocket::new(MockTransport::new(), SyncConfig::default());
        socket.set_status(ConnectionStatus::Reconnecting);
        let dispatcher = RecordingDispatcher::new();

        handle_updates_payload(&socket, &dispatcher, payload(1000)).await;

        assert_eq!(dispatcher.intents().len(), 1);
        assert!(socket.transport().sent_frames().is_empty());
    }

    #[tokio::test]
    async fn failed_ack_is_swallowed() {
        let transport = MockTransport::new();
        transport.fail_next(crate::error::SyncError::transport("socket closed"));
        let socket = SyncSocket::new(transport, SyncConfig::default());
        socket.set_status(ConnectionStatus::Connected);
        let dispatcher = RecordingDispatcher::new();

        // Must not panic or propagate.
        handle_updates_payload(&socket, &dispatcher, payload(1000)).await;
        assert_eq!(dispatcher.intents().len(), 1);
    }
}
