//! Correlation of outbound frames with their responses.

use crate::error::{SyncError, SyncResult};
use chatsync_protocol::{ServerMessageType, ServerSocketMessage};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// Tracks frames awaiting a correlated server response.
///
/// Correlation IDs are strictly increasing and never recycled, so a
/// response arriving after its waiter gave up (or after a reconnect)
/// can never match a newer request. A generation counter marks
/// connection epochs: resetting to a new generation rejects every
/// outstanding waiter at once.
pub struct InflightRequests {
    next_id: AtomicU64,
    generation: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<ServerSocketMessage>>>,
}

impl Default for InflightRequests {
    fn default() -> Self {
        Self::new()
    }
}

impl InflightRequests {
    /// Creates an empty tracker at generation 0.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// The current connection generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Allocates the next correlation ID and registers a waiter for
    /// its response.
    pub fn register(&self) -> (u64, ResponseWaiter) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().insert(id, sender);
        (
            id,
            ResponseWaiter {
                id,
                generation: self.generation(),
                receiver,
            },
        )
    }

    /// Drops the waiter for a frame that was never sent.
    pub fn abandon(&self, id: u64) {
        self.pending.lock().remove(&id);
    }

    /// Routes an inbound frame to its waiter.
    ///
    /// Returns the frame back when it is unsolicited (no `responseTo`)
    /// so the caller can dispatch it; correlated frames with no
    /// matching waiter are stale and silently dropped.
    pub fn resolve(&self, message: ServerSocketMessage) -> Option<ServerSocketMessage> {
        let Some(response_to) = message.response_to() else {
            return Some(message);
        };
        let sender = self.pending.lock().remove(&response_to);
        match sender {
            Some(sender) => {
                if sender.send(message).is_err() {
                    debug!(response_to, "response arrived after its waiter gave up");
                }
            }
            None => debug!(response_to, "discarding response with no inflight request"),
        }
        None
    }

    /// Moves to a new connection generation, rejecting every
    /// outstanding waiter with `ConnectionReset`.
    pub fn reset(&self, new_generation: u64) {
        self.generation.store(new_generation, Ordering::SeqCst);
        let drained: Vec<_> = self.pending.lock().drain().collect();
        if !drained.is_empty() {
            debug!(
                count = drained.len(),
                new_generation, "rejecting inflight requests on connection reset",
            );
        }
        // Dropping the senders closes the channels; waiters observe
        // the closure as ConnectionReset.
        drop(drained);
    }
}

/// One registered waiter, consumed by [`fetch_response`].
pub struct ResponseWaiter {
    id: u64,
    generation: u64,
    receiver: oneshot::Receiver<ServerSocketMessage>,
}

impl ResponseWaiter {
    /// The correlation ID this waiter belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Awaits a waiter's response, requiring a frame of the expected kind.
///
/// A `Pong` or `Requests` frame of the wrong kind is a protocol
/// violation; an `Error` frame resolves to `SyncError::Server` with
/// the server's message verbatim.
pub async fn fetch_response(
    tracker: &InflightRequests,
    waiter: ResponseWaiter,
    expected: ServerMessageType,
    timeout: Duration,
) -> SyncResult<ServerSocketMessage> {
    let ResponseWaiter {
        id,
        generation,
        receiver,
    } = waiter;
    let message = match tokio::time::timeout(timeout, receiver).await {
        Err(_elapsed) => {
            tracker.abandon(id);
            return Err(SyncError::Timeout);
        }
        Ok(Err(_closed)) => {
            return Err(SyncError::ConnectionReset {
                generation: tracker.generation(),
            });
        }
        Ok(Ok(message)) => message,
    };
    // A waiter surviving a generation bump would have been rejected
    // above; this is belt and braces for a racing reset.
    if tracker.generation() != generation {
        return Err(SyncError::ConnectionReset {
            generation: tracker.generation(),
        });
    }
    match message {
        ServerSocketMessage::Error { message, .. } => Err(SyncError::Server(message)),
        message if message.message_type() == expected => Ok(message),
        message => Err(SyncError::Protocol(format!(
            "expected a {expected:?} frame, got {:?}",
            message.message_type(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pong(response_to: u64) -> ServerSocketMessage {
        ServerSocketMessage::Pong { response_to }
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let tracker = InflightRequests::new();
        let (a, _wa) = tracker.register();
        let (b, _wb) = tracker.register();
        let (c, _wc) = tracker.register();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn out_of_order_responses_match_by_id() {
        let tracker = InflightRequests::new();
        let (first_id, first) = tracker.register();
        let (second_id, second) = tracker.register();

        assert!(tracker.resolve(pong(second_id)).is_none());
        assert!(tracker.resolve(pong(first_id)).is_none());

        let timeout = Duration::from_millis(100);
        let message = fetch_response(&tracker, first, ServerMessageType::Pong, timeout)
            .await
            .unwrap();
        assert_eq!(message.response_to(), Some(first_id));
        let message = fetch_response(&tracker, second, ServerMessageType::Pong, timeout)
            .await
            .unwrap();
        assert_eq!(message.response_to(), Some(second_id));
    }

    #[tokio::test]
    async fn timeout_is_distinct_from_reset() {
        let tracker = InflightRequests::new();
        let (_, waiter) = tracker.register();
        let result = fetch_response(
            &tracker,
            waiter,
            ServerMessageType::Pong,
            Duration::from_millis(10),
        )
        .await;
        assert!(matches!(result, Err(SyncError::Timeout)));

        let (_, waiter) = tracker.register();
        tracker.reset(1);
        let result = fetch_response(
            &tracker,
            waiter,
            ServerMessageType::Pong,
            Duration::from_millis(100),
        )
        .await;
        assert!(matches!(
            result,
            Err(SyncError::ConnectionReset { generation: 1 }),
        ));
    }

    #[tokio::test]
    async fn stale_response_after_reset_is_discarded() {
        let tracker = InflightRequests::new();
        let (old_id, _waiter) = tracker.register();
        tracker.reset(1);

        // The pre-reset response no longer matches anything, and is
        // not surfaced as unsolicited traffic either.
        assert!(tracker.resolve(pong(old_id)).is_none());

        // IDs keep increasing across generations; the stale ID can
        // never collide with a post-reset request.
        let (new_id, _waiter) = tracker.register();
        assert!(new_id > old_id);
    }

    #[tokio::test]
    async fn error_frame_maps_to_server_error() {
        let tracker = InflightRequests::new();
        let (id, waiter) = tracker.register();
        tracker.resolve(ServerSocketMessage::Error {
            response_to: Some(id),
            message: "invalid_parameters".to_string(),
        });
        let result = fetch_response(
            &tracker,
            waiter,
            ServerMessageType::Requests,
            Duration::from_millis(100),
        )
        .await;
        match result {
            Err(SyncError::Server(message)) => assert_eq!(message, "invalid_parameters"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_frame_kind_is_a_protocol_error() {
        let tracker = InflightRequests::new();
        let (id, waiter) = tracker.register();
        tracker.resolve(pong(id));
        let result = fetch_response(
            &tracker,
            waiter,
            ServerMessageType::Requests,
            Duration::from_millis(100),
        )
        .await;
        assert!(matches!(result, Err(SyncError::Protocol(_))));
    }

    #[test]
    fn unsolicited_frames_come_back_for_dispatch() {
        let tracker = InflightRequests::new();
        let unsolicited = ServerSocketMessage::Requests {
            response_to: None,
            server_requests: vec![],
        };
        assert!(tracker.resolve(unsolicited).is_some());
    }
}
