//! Server-pushed requests and the client responses that answer them.

use crate::activity::ActivityUpdate;
use crate::entries::{CalendarQuery, RawEntryInfo};
use crate::tagged::{deserialize_tagged, payload, serialize_tagged};
use crate::threads::RawThreadInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key prefix for thread-state hashes in a state-hash-check exchange.
pub const THREAD_HASH_PREFIX: &str = "threadInfo|";

const TAG_PLATFORM: u8 = 0;
const TAG_PLATFORM_DETAILS: u8 = 3;
const TAG_CHECK_STATE: u8 = 6;
const TAG_INITIAL_ACTIVITY_UPDATES: u8 = 7;

/// Platform and build-version identification for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetails {
    /// Platform name ("ios", "android", "web").
    pub platform: String,
    /// Client build version, absent for web.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_version: Option<u64>,
    /// Persisted-state schema version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_version: Option<u64>,
}

/// State the server should correct on the client, sent alongside a
/// state-hash-check request when hashes already failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChanges {
    /// Threads to overwrite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_thread_infos: Vec<RawThreadInfo>,
    /// Entries to overwrite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_entry_infos: Vec<RawEntryInfo>,
    /// Threads to drop.
    #[serde(
        rename = "deleteThreadIDs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub delete_thread_ids: Vec<String>,
    /// Entries to drop.
    #[serde(
        rename = "deleteEntryIDs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub delete_entry_ids: Vec<String>,
}

/// State-hash-check request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStateRequest {
    /// Hashes to verify, keyed by state key (`threadInfo|<id>`, ...).
    pub hashes_to_check: HashMap<String, u64>,
    /// Corrections for hashes a previous round already failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_changes: Option<StateChanges>,
}

/// A request the server pushes at the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerRequest {
    /// Tag 0: identify your platform.
    Platform,
    /// Tag 3: identify your platform details.
    PlatformDetails,
    /// Tag 6: verify these state hashes against your live state.
    CheckState(CheckStateRequest),
    /// Tag 7: deliver the activity updates queued before connection.
    InitialActivityUpdates,
}

impl ServerRequest {
    /// The numeric wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Platform => TAG_PLATFORM,
            Self::PlatformDetails => TAG_PLATFORM_DETAILS,
            Self::CheckState(_) => TAG_CHECK_STATE,
            Self::InitialActivityUpdates => TAG_INITIAL_ACTIVITY_UPDATES,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct EmptyPayload {}

impl Serialize for ServerRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Platform | Self::PlatformDetails | Self::InitialActivityUpdates => {
                serialize_tagged(self.tag(), &EmptyPayload {}, serializer)
            }
            Self::CheckState(request) => serialize_tagged(self.tag(), request, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ServerRequest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = deserialize_tagged(deserializer)?;
        Ok(match tagged.tag {
            TAG_PLATFORM => Self::Platform,
            TAG_PLATFORM_DETAILS => Self::PlatformDetails,
            TAG_CHECK_STATE => Self::CheckState(payload(tagged.value)?),
            TAG_INITIAL_ACTIVITY_UPDATES => Self::InitialActivityUpdates,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown server request type tag {other}"
                )))
            }
        })
    }
}

/// Platform-identification response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformResponse {
    /// Platform name.
    pub platform: String,
}

/// Platform-details response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetailsResponse {
    /// Full platform details.
    pub platform_details: PlatformDetails,
}

/// State-hash-check response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStateResponse {
    /// Per-key verification outcome.
    pub hash_results: HashMap<String, bool>,
}

/// Queued-activity response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialActivityUpdatesResponse {
    /// The activity updates queued before connection.
    pub activity_updates: Vec<ActivityUpdate>,
}

/// The client's answer to one server request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientResponse {
    /// Tag 0.
    Platform(PlatformResponse),
    /// Tag 3.
    PlatformDetails(PlatformDetailsResponse),
    /// Tag 6.
    CheckState(CheckStateResponse),
    /// Tag 7.
    InitialActivityUpdates(InitialActivityUpdatesResponse),
}

impl ClientResponse {
    /// The numeric wire tag, shared with the request it answers.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Platform(_) => TAG_PLATFORM,
            Self::PlatformDetails(_) => TAG_PLATFORM_DETAILS,
            Self::CheckState(_) => TAG_CHECK_STATE,
            Self::InitialActivityUpdates(_) => TAG_INITIAL_ACTIVITY_UPDATES,
        }
    }
}

impl Serialize for ClientResponse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.tag();
        match self {
            Self::Platform(response) => serialize_tagged(tag, response, serializer),
            Self::PlatformDetails(response) => serialize_tagged(tag, response, serializer),
            Self::CheckState(response) => serialize_tagged(tag, response, serializer),
            Self::InitialActivityUpdates(response) => serialize_tagged(tag, response, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ClientResponse {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = deserialize_tagged(deserializer)?;
        let value = tagged.value;
        Ok(match tagged.tag {
            TAG_PLATFORM => Self::Platform(payload(value)?),
            TAG_PLATFORM_DETAILS => Self::PlatformDetails(payload(value)?),
            TAG_CHECK_STATE => Self::CheckState(payload(value)?),
            TAG_INITIAL_ACTIVITY_UPDATES => Self::InitialActivityUpdates(payload(value)?),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown client response type tag {other}"
                )))
            }
        })
    }
}

/// The session context a client reports during state reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// The client's current calendar window.
    pub calendar_query: CalendarQuery,
    /// The client's last-acknowledged update watermark.
    #[serde(rename = "messagesCurrentAsOf")]
    pub messages_current_as_of: u64,
    /// Threads the client is watching without membership.
    #[serde(rename = "watchedIDs")]
    pub watched_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_state_request_roundtrip() {
        let request = ServerRequest::CheckState(CheckStateRequest {
            hashes_to_check: HashMap::from([
                ("threadInfo|42".to_string(), 0xdead_beef_u64),
                ("userInfos".to_string(), 17),
            ]),
            state_changes: None,
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], 6);
        assert_eq!(json["hashesToCheck"]["threadInfo|42"], 0xdead_beef_u64);

        let decoded: ServerRequest = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn bare_server_requests_have_no_payload_fields() {
        let json = serde_json::to_value(&ServerRequest::Platform).unwrap();
        assert_eq!(json, serde_json::json!({ "type": 0 }));

        let decoded: ServerRequest = serde_json::from_str(r#"{"type":7}"#).unwrap();
        assert_eq!(decoded, ServerRequest::InitialActivityUpdates);
    }

    #[test]
    fn client_response_tags_match_requests() {
        let response = ClientResponse::CheckState(CheckStateResponse {
            hash_results: HashMap::from([("threadInfo|42".to_string(), false)]),
        });
        assert_eq!(
            response.tag(),
            ServerRequest::CheckState(CheckStateRequest {
                hashes_to_check: HashMap::new(),
                state_changes: None,
            })
            .tag()
        );
    }

    #[test]
    fn unknown_request_tag_rejected() {
        let result: Result<ServerRequest, _> = serde_json::from_str(r#"{"type":42}"#);
        assert!(result.is_err());
    }
}
