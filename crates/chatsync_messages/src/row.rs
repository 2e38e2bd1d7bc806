//! The stored-row shape specs parse raw messages from.

use chatsync_protocol::MessageType;
use serde::{Deserialize, Serialize};

/// One message row as the client's local store holds it.
///
/// The type-specific payload lives in `content` as the JSON string the
/// type's spec produced via
/// [`MessageSpec::message_content`](crate::MessageSpec::message_content);
/// the remaining columns are shared by every type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRow {
    /// Server-assigned message ID.
    pub id: String,
    /// Client-assigned ID from before the server acked, if any.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// The containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The sender.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Message type tag.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Creation timestamp, milliseconds since the epoch.
    pub time: u64,
    /// Type-specific payload, absent for types with none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
