//! The update envelope: incremental state records pushed by the server.

use crate::entries::RawEntryInfo;
use crate::messages::{RawMessageInfo, TruncationStatus};
use crate::tagged::{deserialize_tagged, payload, serialize_tagged};
use crate::threads::RawThreadInfo;
use crate::users::{CurrentUserInfo, UserInfo};
use serde::{Deserialize, Serialize};

/// Account-deletion update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAccountUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The deleted account.
    #[serde(rename = "deletedUserID")]
    pub deleted_user_id: String,
}

/// Thread-changed update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateThreadUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The thread's new state.
    #[serde(rename = "threadInfo")]
    pub thread_info: RawThreadInfo,
}

/// Read-status-changed update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadReadStatusUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The thread in question.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The thread's new unread state.
    pub unread: bool,
}

/// Thread-deleted update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteThreadUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The deleted thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
}

/// Viewer-joined-thread update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinThreadUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The joined thread's state.
    pub thread_info: RawThreadInfo,
    /// The joined thread's recent messages.
    #[serde(default)]
    pub raw_message_infos: Vec<RawMessageInfo>,
    /// Completeness of the delivered message window.
    pub truncation_status: TruncationStatus,
    /// The joined thread's calendar entries in the client's window.
    #[serde(default)]
    pub raw_entry_infos: Vec<RawEntryInfo>,
}

/// Entry-changed update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntryUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The entry's new state.
    #[serde(rename = "entryInfo")]
    pub entry_info: RawEntryInfo,
}

/// Viewer-account-changed update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCurrentUserUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The viewer's new state.
    #[serde(rename = "currentUserInfo")]
    pub current_user_info: CurrentUserInfo,
}

/// Other-user-changed update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserUpdate {
    /// Update record ID.
    pub id: String,
    /// Watermark timestamp of this record.
    pub time: u64,
    /// The changed user.
    #[serde(rename = "updatedUserID")]
    pub updated_user_id: String,
}

/// One incremental state update pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateInfo {
    /// Tag 0.
    DeleteAccount(DeleteAccountUpdate),
    /// Tag 1.
    UpdateThread(UpdateThreadUpdate),
    /// Tag 2.
    UpdateThreadReadStatus(ThreadReadStatusUpdate),
    /// Tag 3.
    DeleteThread(DeleteThreadUpdate),
    /// Tag 4.
    JoinThread(JoinThreadUpdate),
    /// Tag 6.
    UpdateEntry(UpdateEntryUpdate),
    /// Tag 7.
    UpdateCurrentUser(UpdateCurrentUserUpdate),
    /// Tag 8.
    UpdateUser(UpdateUserUpdate),
}

impl UpdateInfo {
    /// The numeric wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Self::DeleteAccount(_) => 0,
            Self::UpdateThread(_) => 1,
            Self::UpdateThreadReadStatus(_) => 2,
            Self::DeleteThread(_) => 3,
            Self::JoinThread(_) => 4,
            Self::UpdateEntry(_) => 6,
            Self::UpdateCurrentUser(_) => 7,
            Self::UpdateUser(_) => 8,
        }
    }

    /// The watermark timestamp of this record.
    pub fn time(&self) -> u64 {
        match self {
            Self::DeleteAccount(update) => update.time,
            Self::UpdateThread(update) => update.time,
            Self::UpdateThreadReadStatus(update) => update.time,
            Self::DeleteThread(update) => update.time,
            Self::JoinThread(update) => update.time,
            Self::UpdateEntry(update) => update.time,
            Self::UpdateCurrentUser(update) => update.time,
            Self::UpdateUser(update) => update.time,
        }
    }
}

impl Serialize for UpdateInfo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.tag();
        match self {
            Self::DeleteAccount(update) => serialize_tagged(tag, update, serializer),
            Self::UpdateThread(update) => serialize_tagged(tag, update, serializer),
            Self::UpdateThreadReadStatus(update) => serialize_tagged(tag, update, serializer),
            Self::DeleteThread(update) => serialize_tagged(tag, update, serializer),
            Self::JoinThread(update) => serialize_tagged(tag, update, serializer),
            Self::UpdateEntry(update) => serialize_tagged(tag, update, serializer),
            Self::UpdateCurrentUser(update) => serialize_tagged(tag, update, serializer),
            Self::UpdateUser(update) => serialize_tagged(tag, update, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for UpdateInfo {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = deserialize_tagged(deserializer)?;
        let value = tagged.value;
        Ok(match tagged.tag {
            0 => Self::DeleteAccount(payload(value)?),
            1 => Self::UpdateThread(payload(value)?),
            2 => Self::UpdateThreadReadStatus(payload(value)?),
            3 => Self::DeleteThread(payload(value)?),
            4 => Self::JoinThread(payload(value)?),
            6 => Self::UpdateEntry(payload(value)?),
            7 => Self::UpdateCurrentUser(payload(value)?),
            8 => Self::UpdateUser(payload(value)?),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown update type tag {other}"
                )))
            }
        })
    }
}

/// The update envelope: an ordered batch of records plus the watermark
/// the client must acknowledge.
///
/// Applying the same envelope twice must be a no-op once the consumer's
/// watermark has advanced past `current_as_of`; idempotence is by
/// watermark comparison, not per-record deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesResult {
    /// The new records, oldest first.
    pub new_updates: Vec<UpdateInfo>,
    /// The watermark after applying every record in this envelope.
    pub current_as_of: u64,
}

/// An update envelope plus the user records it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesPayload {
    /// The envelope itself.
    pub updates_result: UpdatesResult,
    /// Users referenced by the envelope's records.
    #[serde(default)]
    pub user_infos: Vec<UserInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_info_wire_roundtrip() {
        let update = UpdateInfo::UpdateThreadReadStatus(ThreadReadStatusUpdate {
            id: "301".into(),
            time: 1000,
            thread_id: "42".into(),
            unread: true,
        });
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], 2);
        assert_eq!(json["threadID"], "42");

        let decoded: UpdateInfo = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, update);
    }

    #[test]
    fn unknown_update_tag_rejected() {
        let result: Result<UpdateInfo, _> =
            serde_json::from_str(r#"{"type":5,"id":"1","time":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn updates_result_wire_shape() {
        let result = UpdatesResult {
            new_updates: vec![UpdateInfo::DeleteThread(DeleteThreadUpdate {
                id: "302".into(),
                time: 1000,
                thread_id: "42".into(),
            })],
            current_as_of: 1000,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["currentAsOf"], 1000);
        assert_eq!(json["newUpdates"][0]["type"], 3);
    }
}
