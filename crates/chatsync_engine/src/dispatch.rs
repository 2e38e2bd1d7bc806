//! The seam between the engine and the external state store.

use chatsync_protocol::{CalendarQuery, ServerRequest, UpdateInfo, UpdatesResult, UserInfo};
use parking_lot::Mutex;
use tracing::debug;

/// A state change the engine hands to the external store.
#[derive(Debug, Clone, PartialEq)]
pub enum StateIntent {
    /// Apply an update-stream envelope.
    ProcessUpdates {
        /// The converted envelope.
        updates_result: UpdatesResult,
        /// Users referenced by the envelope.
        user_infos: Vec<UserInfo>,
    },
    /// Record server-pushed requests for the store's own bookkeeping.
    ProcessServerRequests {
        /// The converted requests.
        requests: Vec<ServerRequest>,
        /// The calendar query active when they arrived.
        calendar_query: CalendarQuery,
    },
}

/// Destination for [`StateIntent`]s; the engine never mutates state
/// directly.
pub trait IntentDispatcher: Send + Sync {
    /// Delivers one intent. Delivery is synchronous and must not fail;
    /// the store owns its own durability.
    fn dispatch(&self, intent: StateIntent);
}

/// An `IntentDispatcher` that records everything it receives.
#[derive(Default)]
pub struct RecordingDispatcher {
    intents: Mutex<Vec<StateIntent>>,
}

impl RecordingDispatcher {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every intent received so far, in order.
    pub fn intents(&self) -> Vec<StateIntent> {
        self.intents.lock().clone()
    }
}

impl IntentDispatcher for RecordingDispatcher {
    fn dispatch(&self, intent: StateIntent) {
        self.intents.lock().push(intent);
    }
}

/// A minimal in-memory update store demonstrating the watermark
/// contract consumers of `ProcessUpdates` are expected to follow.
#[derive(Default)]
pub struct MemoryUpdateStore {
    inner: Mutex<MemoryUpdateStoreInner>,
}

#[derive(Default)]
struct MemoryUpdateStoreInner {
    current_as_of: u64,
    updates: Vec<UpdateInfo>,
}

impl MemoryUpdateStore {
    /// Creates an empty store with watermark 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an envelope; returns whether it advanced the store.
    ///
    /// An envelope whose watermark is not greater than the store's is
    /// a redelivery and is ignored, making application idempotent.
    pub fn apply(&self, updates_result: &UpdatesResult) -> bool {
        let mut inner = self.inner.lock();
        if updates_result.current_as_of <= inner.current_as_of {
            debug!(
                envelope = updates_result.current_as_of,
                store = inner.current_as_of,
                "ignoring already-applied update envelope",
            );
            return false;
        }
        inner.current_as_of = updates_result.current_as_of;
        inner.updates.extend(updates_result.new_updates.iter().cloned());
        true
    }

    /// The store's current watermark.
    pub fn current_as_of(&self) -> u64 {
        self.inner.lock().current_as_of
    }

    /// Every applied update, in arrival order.
    pub fn updates(&self) -> Vec<UpdateInfo> {
        self.inner.lock().updates.clone()
    }
}
