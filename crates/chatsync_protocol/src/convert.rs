//! Structural ID namespace conversion.
//!
//! Every ID-bearing payload that crosses the socket passes through one
//! of these converters, which walk the structure and rewrite each
//! thread ID for the target namespace. Today the per-ID mapping is the
//! identity, so the converters are behavior-preserving; the traversal
//! exists so that introducing a real mapping is a one-function change
//! rather than a payload-by-payload audit.

use crate::activity::ActivityUpdate;
use crate::entries::{CalendarFilter, CalendarQuery, RawEntryInfo};
use crate::messages::RawMessageInfo;
use crate::requests::{
    ClientResponse, ServerRequest, SessionState, StateChanges, THREAD_HASH_PREFIX,
};
use crate::threads::{NewThreadRequest, RawThreadInfo, UpdateThreadRequest};
use crate::updates::{UpdateInfo, UpdatesPayload};
use std::collections::HashMap;

/// Which namespace boundary a payload is crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// Outbound: client namespace to server namespace.
    ClientToServer,
    /// Inbound: server namespace to client namespace.
    ServerToClient,
}

/// Rewrites a single thread ID for the target namespace.
///
/// The mapping is currently the identity in both directions. IDs are
/// expected to be numeric strings; a non-numeric ID trips a debug
/// assertion and passes through unchanged in release builds.
pub fn convert_thread_id(direction: ConversionDirection, id: &str) -> String {
    let _ = direction;
    debug_assert!(
        id.parse::<u64>().is_ok(),
        "thread ID is not a numeric string: {id:?}"
    );
    id.to_string()
}

/// Rewrites the keys of a state-hash map.
///
/// Keys of the form `threadInfo|<id>` have only the ID segment
/// converted; all other keys pass through unchanged.
pub fn convert_hashes<V>(
    direction: ConversionDirection,
    hashes: HashMap<String, V>,
) -> HashMap<String, V> {
    hashes
        .into_iter()
        .map(|(key, value)| {
            let key = match key.strip_prefix(THREAD_HASH_PREFIX) {
                Some(id) => format!("{THREAD_HASH_PREFIX}{}", convert_thread_id(direction, id)),
                None => key,
            };
            (key, value)
        })
        .collect()
}

/// Converts a server-shaped thread, including its parent link.
pub fn convert_raw_thread_info(
    direction: ConversionDirection,
    mut thread_info: RawThreadInfo,
) -> RawThreadInfo {
    thread_info.id = convert_thread_id(direction, &thread_info.id);
    thread_info.parent_thread_id = thread_info
        .parent_thread_id
        .map(|id| convert_thread_id(direction, &id));
    thread_info
}

/// Converts a calendar entry's thread reference.
pub fn convert_raw_entry_info(
    direction: ConversionDirection,
    mut entry_info: RawEntryInfo,
) -> RawEntryInfo {
    entry_info.thread_id = convert_thread_id(direction, &entry_info.thread_id);
    entry_info
}

/// Converts a batch of calendar entries.
pub fn convert_raw_entry_infos(
    direction: ConversionDirection,
    entry_infos: Vec<RawEntryInfo>,
) -> Vec<RawEntryInfo> {
    entry_infos
        .into_iter()
        .map(|entry_info| convert_raw_entry_info(direction, entry_info))
        .collect()
}

/// Converts every thread reference inside one message.
///
/// Besides the containing thread this covers the parent link inside a
/// `CreateThread` initial state and the child link of a
/// `CreateSubThread`. The opaque payload inside an `Unsupported`
/// message is left untouched; it is only ever echoed back verbatim.
pub fn convert_raw_message_info(
    direction: ConversionDirection,
    message_info: RawMessageInfo,
) -> RawMessageInfo {
    match message_info {
        RawMessageInfo::Text(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::Text(info)
        }
        RawMessageInfo::CreateThread(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            info.initial_thread_state.parent_thread_id = info
                .initial_thread_state
                .parent_thread_id
                .map(|id| convert_thread_id(direction, &id));
            RawMessageInfo::CreateThread(info)
        }
        RawMessageInfo::AddMembers(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::AddMembers(info)
        }
        RawMessageInfo::CreateSubThread(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            info.child_thread_id = convert_thread_id(direction, &info.child_thread_id);
            RawMessageInfo::CreateSubThread(info)
        }
        RawMessageInfo::ChangeSettings(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::ChangeSettings(info)
        }
        RawMessageInfo::RemoveMembers(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::RemoveMembers(info)
        }
        RawMessageInfo::ChangeRole(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::ChangeRole(info)
        }
        RawMessageInfo::LeaveThread(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::LeaveThread(info)
        }
        RawMessageInfo::JoinThread(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::JoinThread(info)
        }
        RawMessageInfo::CreateEntry(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::CreateEntry(info)
        }
        RawMessageInfo::EditEntry(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::EditEntry(info)
        }
        RawMessageInfo::DeleteEntry(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::DeleteEntry(info)
        }
        RawMessageInfo::RestoreEntry(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::RestoreEntry(info)
        }
        RawMessageInfo::Unsupported(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::Unsupported(info)
        }
        RawMessageInfo::Images(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::Images(info)
        }
        RawMessageInfo::Multimedia(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            RawMessageInfo::Multimedia(info)
        }
    }
}

/// Converts a batch of messages.
pub fn convert_raw_message_infos(
    direction: ConversionDirection,
    message_infos: Vec<RawMessageInfo>,
) -> Vec<RawMessageInfo> {
    message_infos
        .into_iter()
        .map(|message_info| convert_raw_message_info(direction, message_info))
        .collect()
}

/// Converts every thread reference inside one update record.
pub fn convert_update_info(direction: ConversionDirection, update: UpdateInfo) -> UpdateInfo {
    match update {
        UpdateInfo::DeleteAccount(info) => UpdateInfo::DeleteAccount(info),
        UpdateInfo::UpdateThread(mut info) => {
            info.thread_info = convert_raw_thread_info(direction, info.thread_info);
            UpdateInfo::UpdateThread(info)
        }
        UpdateInfo::UpdateThreadReadStatus(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            UpdateInfo::UpdateThreadReadStatus(info)
        }
        UpdateInfo::DeleteThread(mut info) => {
            info.thread_id = convert_thread_id(direction, &info.thread_id);
            UpdateInfo::DeleteThread(info)
        }
        UpdateInfo::JoinThread(mut info) => {
            info.thread_info = convert_raw_thread_info(direction, info.thread_info);
            info.raw_message_infos = convert_raw_message_infos(direction, info.raw_message_infos);
            info.raw_entry_infos = convert_raw_entry_infos(direction, info.raw_entry_infos);
            UpdateInfo::JoinThread(info)
        }
        UpdateInfo::UpdateEntry(mut info) => {
            info.entry_info = convert_raw_entry_info(direction, info.entry_info);
            UpdateInfo::UpdateEntry(info)
        }
        UpdateInfo::UpdateCurrentUser(info) => UpdateInfo::UpdateCurrentUser(info),
        UpdateInfo::UpdateUser(info) => UpdateInfo::UpdateUser(info),
    }
}

/// Converts a batch of update records.
pub fn convert_update_infos(
    direction: ConversionDirection,
    updates: Vec<UpdateInfo>,
) -> Vec<UpdateInfo> {
    updates
        .into_iter()
        .map(|update| convert_update_info(direction, update))
        .collect()
}

/// Converts a full update envelope.
pub fn convert_updates_payload(
    direction: ConversionDirection,
    mut payload: UpdatesPayload,
) -> UpdatesPayload {
    payload.updates_result.new_updates =
        convert_update_infos(direction, payload.updates_result.new_updates);
    payload
}

/// Converts the thread filters of a calendar query.
pub fn convert_calendar_query(
    direction: ConversionDirection,
    mut query: CalendarQuery,
) -> CalendarQuery {
    query.filters = query
        .filters
        .into_iter()
        .map(|filter| match filter {
            CalendarFilter::NotDeleted => CalendarFilter::NotDeleted,
            CalendarFilter::Threads { thread_ids } => CalendarFilter::Threads {
                thread_ids: thread_ids
                    .iter()
                    .map(|id| convert_thread_id(direction, id))
                    .collect(),
            },
        })
        .collect();
    query
}

/// Converts a session state snapshot for initial handshake.
pub fn convert_session_state(
    direction: ConversionDirection,
    mut state: SessionState,
) -> SessionState {
    state.calendar_query = convert_calendar_query(direction, state.calendar_query);
    state.watched_ids = state
        .watched_ids
        .iter()
        .map(|id| convert_thread_id(direction, id))
        .collect();
    state
}

/// Converts a batch of activity updates.
pub fn convert_activity_updates(
    direction: ConversionDirection,
    updates: Vec<ActivityUpdate>,
) -> Vec<ActivityUpdate> {
    updates
        .into_iter()
        .map(|mut update| {
            update.thread_id = convert_thread_id(direction, &update.thread_id);
            update
        })
        .collect()
}

fn convert_state_changes(direction: ConversionDirection, mut changes: StateChanges) -> StateChanges {
    changes.raw_thread_infos = changes
        .raw_thread_infos
        .into_iter()
        .map(|thread_info| convert_raw_thread_info(direction, thread_info))
        .collect();
    changes.raw_entry_infos = convert_raw_entry_infos(direction, changes.raw_entry_infos);
    changes.delete_thread_ids = changes
        .delete_thread_ids
        .iter()
        .map(|id| convert_thread_id(direction, id))
        .collect();
    changes
}

/// Converts a server-pushed request into the target namespace.
pub fn convert_server_request(
    direction: ConversionDirection,
    request: ServerRequest,
) -> ServerRequest {
    match request {
        ServerRequest::CheckState(mut check) => {
            check.hashes_to_check = convert_hashes(direction, check.hashes_to_check);
            check.state_changes = check
                .state_changes
                .map(|changes| convert_state_changes(direction, changes));
            ServerRequest::CheckState(check)
        }
        other => other,
    }
}

/// Converts a client response into the target namespace.
pub fn convert_client_response(
    direction: ConversionDirection,
    response: ClientResponse,
) -> ClientResponse {
    match response {
        ClientResponse::CheckState(mut check) => {
            check.hash_results = convert_hashes(direction, check.hash_results);
            ClientResponse::CheckState(check)
        }
        ClientResponse::InitialActivityUpdates(mut initial) => {
            initial.activity_updates = convert_activity_updates(direction, initial.activity_updates);
            ClientResponse::InitialActivityUpdates(initial)
        }
        other => other,
    }
}

/// Converts an `update_thread` request body.
pub fn convert_update_thread_request(
    direction: ConversionDirection,
    mut request: UpdateThreadRequest,
) -> UpdateThreadRequest {
    request.thread_id = convert_thread_id(direction, &request.thread_id);
    request.changes.parent_thread_id = request
        .changes
        .parent_thread_id
        .map(|id| convert_thread_id(direction, &id));
    request
}

/// Converts a `create_thread` request body.
pub fn convert_new_thread_request(
    direction: ConversionDirection,
    mut request: NewThreadRequest,
) -> NewThreadRequest {
    request.parent_thread_id = request
        .parent_thread_id
        .map(|id| convert_thread_id(direction, &id));
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{InitialThreadState, RawCreateThreadMessageInfo, RawSubThreadMessageInfo};
    use crate::requests::CheckStateRequest;
    use proptest::prelude::*;

    const OUT: ConversionDirection = ConversionDirection::ClientToServer;
    const IN: ConversionDirection = ConversionDirection::ServerToClient;

    #[test]
    fn hash_keys_keep_prefix() {
        let mut hashes = HashMap::new();
        hashes.insert("threadInfo|42".to_string(), 777_u64);
        hashes.insert("entryInfos".to_string(), 888_u64);

        let converted = convert_hashes(OUT, hashes);
        assert_eq!(converted.get("threadInfo|42"), Some(&777));
        assert_eq!(converted.get("entryInfos"), Some(&888));
    }

    #[test]
    fn create_thread_message_converts_parent_link() {
        let message = RawMessageInfo::CreateThread(RawCreateThreadMessageInfo {
            id: "9001".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            initial_thread_state: InitialThreadState {
                thread_type: 3,
                name: None,
                parent_thread_id: Some("7".into()),
                color: "aa4b4b".into(),
                member_ids: vec!["85".into()],
            },
        });
        let converted = convert_raw_message_info(IN, message.clone());
        assert_eq!(converted, message);
    }

    #[test]
    fn sub_thread_message_converts_both_ends() {
        let message = RawMessageInfo::CreateSubThread(RawSubThreadMessageInfo {
            id: "9002".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            child_thread_id: "43".into(),
        });
        let converted = convert_raw_message_info(OUT, message.clone());
        assert_eq!(converted, message);
    }

    #[test]
    fn check_state_request_converts_all_sections() {
        let mut hashes = HashMap::new();
        hashes.insert("threadInfo|42".to_string(), 1_u64);
        let request = ServerRequest::CheckState(CheckStateRequest {
            hashes_to_check: hashes,
            state_changes: Some(StateChanges {
                raw_thread_infos: vec![],
                raw_entry_infos: vec![],
                delete_thread_ids: vec!["17".into()],
                delete_entry_ids: vec!["e1".into()],
            }),
        });
        let converted = convert_server_request(IN, request.clone());
        assert_eq!(converted, request);
    }

    #[test]
    fn calendar_filters_traversed() {
        let query = CalendarQuery {
            start_date: "2020-01-01".into(),
            end_date: "2020-02-01".into(),
            filters: vec![
                CalendarFilter::NotDeleted,
                CalendarFilter::Threads {
                    thread_ids: vec!["42".into(), "43".into()],
                },
            ],
        };
        let converted = convert_calendar_query(OUT, query.clone());
        assert_eq!(converted, query);
    }

    proptest! {
        // The per-ID mapping is the identity, so a round trip through
        // both directions must reproduce the input exactly.
        #[test]
        fn round_trip_is_identity(id in 0u64..u64::MAX) {
            let id = id.to_string();
            let outbound = convert_thread_id(OUT, &id);
            let back = convert_thread_id(IN, &outbound);
            prop_assert_eq!(back, id);
        }
    }
}
