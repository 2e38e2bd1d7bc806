//! Message payload shapes and the message-facing wire calls.

use crate::tagged::{deserialize_tagged, payload, serialize_tagged};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix for client-generated temporary message and entry IDs.
pub const LOCAL_ID_PREFIX: &str = "local";

/// Numeric message-type tags, matching the server's constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// A plain text message.
    Text = 0,
    /// Thread creation system message.
    CreateThread = 1,
    /// Members-added system message.
    AddMembers = 2,
    /// Subthread-created system message.
    CreateSubThread = 3,
    /// Settings-changed system message.
    ChangeSettings = 4,
    /// Members-removed system message.
    RemoveMembers = 5,
    /// Role-changed system message.
    ChangeRole = 6,
    /// Member-left system message.
    LeaveThread = 7,
    /// Member-joined system message.
    JoinThread = 8,
    /// Calendar-entry-created system message.
    CreateEntry = 9,
    /// Calendar-entry-edited system message.
    EditEntry = 10,
    /// Calendar-entry-deleted system message.
    DeleteEntry = 11,
    /// Calendar-entry-restored system message.
    RestoreEntry = 12,
    /// Placeholder for messages this client build cannot render.
    Unsupported = 13,
    /// A photo message.
    Images = 14,
    /// A mixed-media message.
    Multimedia = 15,
}

impl MessageType {
    /// The numeric wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Resolves a wire tag, or `None` for tags this build does not know.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Text),
            1 => Some(Self::CreateThread),
            2 => Some(Self::AddMembers),
            3 => Some(Self::CreateSubThread),
            4 => Some(Self::ChangeSettings),
            5 => Some(Self::RemoveMembers),
            6 => Some(Self::ChangeRole),
            7 => Some(Self::LeaveThread),
            8 => Some(Self::JoinThread),
            9 => Some(Self::CreateEntry),
            10 => Some(Self::EditEntry),
            11 => Some(Self::DeleteEntry),
            12 => Some(Self::RestoreEntry),
            13 => Some(Self::Unsupported),
            14 => Some(Self::Images),
            15 => Some(Self::Multimedia),
            _ => None,
        }
    }
}

impl Serialize for MessageType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.tag())
    }
}

impl<'de> Deserialize<'de> for MessageType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = u8::deserialize(deserializer)?;
        Self::from_tag(tag)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown message type tag {tag}")))
    }
}

/// Pixel dimensions of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A single media item attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Media {
    /// A still image.
    Photo {
        /// Server-assigned upload ID.
        id: String,
        /// Fetch URI.
        uri: String,
        /// Pixel dimensions; absent only for a fixed set of historical
        /// uploads (see the multimedia spec's unshim path).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
    },
    /// A video.
    Video {
        /// Server-assigned upload ID.
        id: String,
        /// Fetch URI.
        uri: String,
        /// Pixel dimensions.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
    },
}

impl Media {
    /// The upload ID.
    pub fn id(&self) -> &str {
        match self {
            Media::Photo { id, .. } | Media::Video { id, .. } => id,
        }
    }

    /// The fetch URI.
    pub fn uri(&self) -> &str {
        match self {
            Media::Photo { uri, .. } | Media::Video { uri, .. } => uri,
        }
    }

    /// The pixel dimensions, when known.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            Media::Photo { dimensions, .. } | Media::Video { dimensions, .. } => *dimensions,
        }
    }
}

/// Text message payload. Optimistic: may exist before server confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextMessageInfo {
    /// Server-assigned message ID; absent until confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client-generated temporary ID; present for client-originated sends.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// Message text.
    pub text: String,
}

/// The thread state recorded by a thread-creation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialThreadState {
    /// Thread type tag.
    #[serde(rename = "type")]
    pub thread_type: i32,
    /// Thread name at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent thread at creation.
    #[serde(
        rename = "parentThreadID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_thread_id: Option<String>,
    /// Display color at creation.
    pub color: String,
    /// Members at creation, including the creator.
    #[serde(rename = "memberIDs")]
    pub member_ids: Vec<String>,
}

/// Thread-creation system message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCreateThreadMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The created thread's initial state.
    #[serde(rename = "initialThreadState")]
    pub initial_thread_state: InitialThreadState,
}

/// Membership-change system message payload (add or remove).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMembershipMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The affected users.
    #[serde(rename = "userIDs")]
    pub user_ids: Vec<String>,
}

/// Subthread-creation system message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSubThreadMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing (parent) thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The created subthread.
    #[serde(rename = "childThreadID")]
    pub child_thread_id: String,
}

/// Settings-change system message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChangeSettingsMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// Which settings field changed ("name", "color", ...).
    pub field: String,
    /// The new value, shape depending on the field.
    pub value: serde_json::Value,
}

/// Role-change system message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChangeRoleMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The users whose role changed.
    #[serde(rename = "userIDs")]
    pub user_ids: Vec<String>,
    /// The role they now hold.
    #[serde(rename = "newRole")]
    pub new_role: String,
}

/// Join/leave system message payload (no type-specific fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawThreadOpMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
}

/// Calendar-entry operation system message payload, shared by the
/// create/edit/delete/restore variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntryOpMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The affected entry.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// The entry's date, `YYYY-MM-DD`.
    pub date: String,
    /// The entry's text at the time of the operation.
    pub text: String,
}

/// Placeholder payload for messages this client build cannot render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUnsupportedMessageInfo {
    /// Server-assigned message ID.
    pub id: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// Fallback description to render.
    pub robotext: String,
    /// Whether the robotext already names the creator.
    #[serde(rename = "dontPrefixCreator", default)]
    pub dont_prefix_creator: bool,
    /// The original message, preserved for a future unshim.
    #[serde(rename = "unsupportedMessageInfo")]
    pub unsupported_message_info: serde_json::Value,
}

/// Photo message payload. Optimistic: may exist before server confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawImagesMessageInfo {
    /// Server-assigned message ID; absent until confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client-generated temporary ID; present for client-originated sends.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The attached photos.
    pub media: Vec<Media>,
}

/// Mixed-media message payload. Optimistic like [`RawImagesMessageInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMediaMessageInfo {
    /// Server-assigned message ID; absent until confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client-generated temporary ID; present for client-originated sends.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Message author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The attached media.
    pub media: Vec<Media>,
}

/// The canonical server-shaped representation of one message of any type.
///
/// A message is identified either locally (pending), permanently
/// (confirmed), or both (confirmed and still locally known); never
/// neither. Creation-time message data is represented as a raw info
/// whose server ID is still absent.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMessageInfo {
    /// Tag 0.
    Text(RawTextMessageInfo),
    /// Tag 1.
    CreateThread(RawCreateThreadMessageInfo),
    /// Tag 2.
    AddMembers(RawMembershipMessageInfo),
    /// Tag 3.
    CreateSubThread(RawSubThreadMessageInfo),
    /// Tag 4.
    ChangeSettings(RawChangeSettingsMessageInfo),
    /// Tag 5.
    RemoveMembers(RawMembershipMessageInfo),
    /// Tag 6.
    ChangeRole(RawChangeRoleMessageInfo),
    /// Tag 7.
    LeaveThread(RawThreadOpMessageInfo),
    /// Tag 8.
    JoinThread(RawThreadOpMessageInfo),
    /// Tag 9.
    CreateEntry(RawEntryOpMessageInfo),
    /// Tag 10.
    EditEntry(RawEntryOpMessageInfo),
    /// Tag 11.
    DeleteEntry(RawEntryOpMessageInfo),
    /// Tag 12.
    RestoreEntry(RawEntryOpMessageInfo),
    /// Tag 13.
    Unsupported(RawUnsupportedMessageInfo),
    /// Tag 14.
    Images(RawImagesMessageInfo),
    /// Tag 15.
    Multimedia(RawMediaMessageInfo),
}

impl RawMessageInfo {
    /// The message-type tag of this info.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Text(_) => MessageType::Text,
            Self::CreateThread(_) => MessageType::CreateThread,
            Self::AddMembers(_) => MessageType::AddMembers,
            Self::CreateSubThread(_) => MessageType::CreateSubThread,
            Self::ChangeSettings(_) => MessageType::ChangeSettings,
            Self::RemoveMembers(_) => MessageType::RemoveMembers,
            Self::ChangeRole(_) => MessageType::ChangeRole,
            Self::LeaveThread(_) => MessageType::LeaveThread,
            Self::JoinThread(_) => MessageType::JoinThread,
            Self::CreateEntry(_) => MessageType::CreateEntry,
            Self::EditEntry(_) => MessageType::EditEntry,
            Self::DeleteEntry(_) => MessageType::DeleteEntry,
            Self::RestoreEntry(_) => MessageType::RestoreEntry,
            Self::Unsupported(_) => MessageType::Unsupported,
            Self::Images(_) => MessageType::Images,
            Self::Multimedia(_) => MessageType::Multimedia,
        }
    }

    /// The server-assigned ID, absent for unconfirmed optimistic sends.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Text(info) => info.id.as_deref(),
            Self::Images(info) => info.id.as_deref(),
            Self::Multimedia(info) => info.id.as_deref(),
            Self::CreateThread(info) => Some(&info.id),
            Self::AddMembers(info) | Self::RemoveMembers(info) => Some(&info.id),
            Self::CreateSubThread(info) => Some(&info.id),
            Self::ChangeSettings(info) => Some(&info.id),
            Self::ChangeRole(info) => Some(&info.id),
            Self::LeaveThread(info) | Self::JoinThread(info) => Some(&info.id),
            Self::CreateEntry(info)
            | Self::EditEntry(info)
            | Self::DeleteEntry(info)
            | Self::RestoreEntry(info) => Some(&info.id),
            Self::Unsupported(info) => Some(&info.id),
        }
    }

    /// The client-local temporary ID, present only for pending sends.
    pub fn local_id(&self) -> Option<&str> {
        match self {
            Self::Text(info) => info.local_id.as_deref(),
            Self::Images(info) => info.local_id.as_deref(),
            Self::Multimedia(info) => info.local_id.as_deref(),
            _ => None,
        }
    }

    /// The containing thread.
    pub fn thread_id(&self) -> &str {
        match self {
            Self::Text(info) => &info.thread_id,
            Self::CreateThread(info) => &info.thread_id,
            Self::AddMembers(info) | Self::RemoveMembers(info) => &info.thread_id,
            Self::CreateSubThread(info) => &info.thread_id,
            Self::ChangeSettings(info) => &info.thread_id,
            Self::ChangeRole(info) => &info.thread_id,
            Self::LeaveThread(info) | Self::JoinThread(info) => &info.thread_id,
            Self::CreateEntry(info)
            | Self::EditEntry(info)
            | Self::DeleteEntry(info)
            | Self::RestoreEntry(info) => &info.thread_id,
            Self::Unsupported(info) => &info.thread_id,
            Self::Images(info) => &info.thread_id,
            Self::Multimedia(info) => &info.thread_id,
        }
    }

    /// The message author.
    pub fn creator_id(&self) -> &str {
        match self {
            Self::Text(info) => &info.creator_id,
            Self::CreateThread(info) => &info.creator_id,
            Self::AddMembers(info) | Self::RemoveMembers(info) => &info.creator_id,
            Self::CreateSubThread(info) => &info.creator_id,
            Self::ChangeSettings(info) => &info.creator_id,
            Self::ChangeRole(info) => &info.creator_id,
            Self::LeaveThread(info) | Self::JoinThread(info) => &info.creator_id,
            Self::CreateEntry(info)
            | Self::EditEntry(info)
            | Self::DeleteEntry(info)
            | Self::RestoreEntry(info) => &info.creator_id,
            Self::Unsupported(info) => &info.creator_id,
            Self::Images(info) => &info.creator_id,
            Self::Multimedia(info) => &info.creator_id,
        }
    }

    /// The message timestamp, milliseconds since the epoch.
    pub fn time(&self) -> u64 {
        match self {
            Self::Text(info) => info.time,
            Self::CreateThread(info) => info.time,
            Self::AddMembers(info) | Self::RemoveMembers(info) => info.time,
            Self::CreateSubThread(info) => info.time,
            Self::ChangeSettings(info) => info.time,
            Self::ChangeRole(info) => info.time,
            Self::LeaveThread(info) | Self::JoinThread(info) => info.time,
            Self::CreateEntry(info)
            | Self::EditEntry(info)
            | Self::DeleteEntry(info)
            | Self::RestoreEntry(info) => info.time,
            Self::Unsupported(info) => info.time,
            Self::Images(info) => info.time,
            Self::Multimedia(info) => info.time,
        }
    }

    /// Attaches the server-assigned ID to a pending optimistic send.
    ///
    /// A no-op for system-message variants; their ID is always
    /// server-assigned at hydration.
    pub fn with_server_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            Self::Text(info) => info.id = Some(id),
            Self::Images(info) => info.id = Some(id),
            Self::Multimedia(info) => info.id = Some(id),
            _ => {}
        }
        self
    }
}

impl Serialize for RawMessageInfo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.message_type().tag();
        match self {
            Self::Text(info) => serialize_tagged(tag, info, serializer),
            Self::CreateThread(info) => serialize_tagged(tag, info, serializer),
            Self::AddMembers(info) | Self::RemoveMembers(info) => {
                serialize_tagged(tag, info, serializer)
            }
            Self::CreateSubThread(info) => serialize_tagged(tag, info, serializer),
            Self::ChangeSettings(info) => serialize_tagged(tag, info, serializer),
            Self::ChangeRole(info) => serialize_tagged(tag, info, serializer),
            Self::LeaveThread(info) | Self::JoinThread(info) => {
                serialize_tagged(tag, info, serializer)
            }
            Self::CreateEntry(info)
            | Self::EditEntry(info)
            | Self::DeleteEntry(info)
            | Self::RestoreEntry(info) => serialize_tagged(tag, info, serializer),
            Self::Unsupported(info) => serialize_tagged(tag, info, serializer),
            Self::Images(info) => serialize_tagged(tag, info, serializer),
            Self::Multimedia(info) => serialize_tagged(tag, info, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RawMessageInfo {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = deserialize_tagged(deserializer)?;
        let message_type = MessageType::from_tag(tagged.tag).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown message type tag {}", tagged.tag))
        })?;
        let value = tagged.value;
        Ok(match message_type {
            MessageType::Text => Self::Text(payload(value)?),
            MessageType::CreateThread => Self::CreateThread(payload(value)?),
            MessageType::AddMembers => Self::AddMembers(payload(value)?),
            MessageType::CreateSubThread => Self::CreateSubThread(payload(value)?),
            MessageType::ChangeSettings => Self::ChangeSettings(payload(value)?),
            MessageType::RemoveMembers => Self::RemoveMembers(payload(value)?),
            MessageType::ChangeRole => Self::ChangeRole(payload(value)?),
            MessageType::LeaveThread => Self::LeaveThread(payload(value)?),
            MessageType::JoinThread => Self::JoinThread(payload(value)?),
            MessageType::CreateEntry => Self::CreateEntry(payload(value)?),
            MessageType::EditEntry => Self::EditEntry(payload(value)?),
            MessageType::DeleteEntry => Self::DeleteEntry(payload(value)?),
            MessageType::RestoreEntry => Self::RestoreEntry(payload(value)?),
            MessageType::Unsupported => Self::Unsupported(payload(value)?),
            MessageType::Images => Self::Images(payload(value)?),
            MessageType::Multimedia => Self::Multimedia(payload(value)?),
        })
    }
}

/// How complete a fetched message window is for a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationStatus {
    /// Older messages exist beyond the window.
    Truncated,
    /// The window connects to what the client already has.
    Unchanged,
    /// The window reaches the start of the thread.
    Exhaustive,
}

/// Request body for the `fetch_messages` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchMessagesRequest {
    /// Pagination cursors keyed by thread ID; a `null` cursor fetches
    /// the most recent window.
    pub cursors: HashMap<String, Option<String>>,
}

/// Response body for the `fetch_messages` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchMessagesResponse {
    /// The fetched messages.
    pub raw_message_infos: Vec<RawMessageInfo>,
    /// Window completeness per thread.
    pub truncation_statuses: HashMap<String, TruncationStatus>,
}

/// The confirmed identity of a just-sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessageBrief {
    /// Server-assigned message ID.
    pub id: String,
    /// Server-assigned timestamp, milliseconds since the epoch.
    pub time: u64,
}

/// Response body for the `create_text_message` and
/// `create_multimedia_message` wire calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// The confirmed message identity.
    pub new_message_info: NewMessageBrief,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_tags_roundtrip() {
        for tag in 0..16 {
            let message_type = MessageType::from_tag(tag).unwrap();
            assert_eq!(message_type.tag(), tag);
        }
        assert!(MessageType::from_tag(16).is_none());
    }

    #[test]
    fn unknown_message_type_tag_rejected() {
        let result: Result<MessageType, _> = serde_json::from_str("200");
        assert!(result.is_err());
    }

    #[test]
    fn text_message_wire_shape() {
        let raw = RawMessageInfo::Text(RawTextMessageInfo {
            id: None,
            local_id: Some("local7".into()),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1_700_000_000_000,
            text: "hello".into(),
        });
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["type"], 0);
        assert_eq!(json["localID"], "local7");
        assert_eq!(json["threadID"], "42");
        assert!(json.get("id").is_none());

        let decoded: RawMessageInfo = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn change_role_wire_roundtrip() {
        let raw = RawMessageInfo::ChangeRole(RawChangeRoleMessageInfo {
            id: "9001".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1_700_000_000_000,
            user_ids: vec!["86".into(), "87".into()],
            new_role: "140".into(),
        });
        let json = serde_json::to_string(&raw).unwrap();
        let decoded: RawMessageInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, raw);
        assert_eq!(decoded.message_type(), MessageType::ChangeRole);
    }

    #[test]
    fn membership_variants_share_payload_but_not_tag() {
        let payload = RawMembershipMessageInfo {
            id: "10".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            user_ids: vec!["86".into()],
        };
        let added = serde_json::to_value(RawMessageInfo::AddMembers(payload.clone())).unwrap();
        let removed = serde_json::to_value(RawMessageInfo::RemoveMembers(payload)).unwrap();
        assert_eq!(added["type"], 2);
        assert_eq!(removed["type"], 5);
    }

    #[test]
    fn unknown_raw_message_tag_rejected() {
        let result: Result<RawMessageInfo, _> =
            serde_json::from_str(r#"{"type":99,"threadID":"42"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn with_server_id_confirms_pending_send() {
        let pending = RawMessageInfo::Text(RawTextMessageInfo {
            id: None,
            local_id: Some("local7".into()),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            text: "hello".into(),
        });
        let confirmed = pending.with_server_id("9001");
        assert_eq!(confirmed.id(), Some("9001"));
        assert_eq!(confirmed.local_id(), Some("local7"));
    }

    #[test]
    fn media_wire_tags() {
        let photo = Media::Photo {
            id: "156642".into(),
            uri: "https://cdn.example.com/156642".into(),
            dimensions: Some(Dimensions {
                width: 1440,
                height: 1080,
            }),
        };
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["type"], "photo");

        let video: Media =
            serde_json::from_value(serde_json::json!({
                "type": "video",
                "id": "7",
                "uri": "https://cdn.example.com/7",
            }))
            .unwrap();
        assert!(matches!(video, Media::Video { .. }));
    }
}
