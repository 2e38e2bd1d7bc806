//! Resolved message shapes for display.

use chatsync_protocol::{Media, MessageType, RelativeUserInfo};
use serde::{Deserialize, Serialize};

/// A raw message resolved against the viewer and the user store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageInfo {
    /// A user-authored text message.
    Text {
        /// Server-assigned ID, absent while the send is in flight.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Client-assigned ID used before the server acked.
        #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
        local_id: Option<String>,
        /// The containing thread.
        #[serde(rename = "threadID")]
        thread_id: String,
        /// The sender, viewer-relative.
        creator: RelativeUserInfo,
        /// Creation timestamp, milliseconds since the epoch.
        time: u64,
        /// The message text.
        text: String,
    },
    /// A user-authored media message.
    Media {
        /// Server-assigned ID, absent while the send is in flight.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Client-assigned ID used before the server acked.
        #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
        local_id: Option<String>,
        /// The containing thread.
        #[serde(rename = "threadID")]
        thread_id: String,
        /// The sender, viewer-relative.
        creator: RelativeUserInfo,
        /// Creation timestamp, milliseconds since the epoch.
        time: u64,
        /// The attached media.
        media: Vec<Media>,
    },
    /// A system-generated message rendered from robotext.
    Robotext(RobotextMessageInfo),
}

impl MessageInfo {
    /// The containing thread.
    pub fn thread_id(&self) -> &str {
        match self {
            Self::Text { thread_id, .. } | Self::Media { thread_id, .. } => thread_id,
            Self::Robotext(info) => &info.thread_id,
        }
    }

    /// The sender.
    pub fn creator(&self) -> &RelativeUserInfo {
        match self {
            Self::Text { creator, .. } | Self::Media { creator, .. } => creator,
            Self::Robotext(info) => &info.creator,
        }
    }

    /// Creation timestamp.
    pub fn time(&self) -> u64 {
        match self {
            Self::Text { time, .. } | Self::Media { time, .. } => *time,
            Self::Robotext(info) => info.time,
        }
    }
}

/// A resolved system message.
///
/// The robotext is entity-encoded: user and thread references appear as
/// `<text|uID>` and `<text|tID>` segments so the renderer can link
/// them. [`stripped_robotext`](crate::stripped_robotext) flattens the
/// encoding for plain-text contexts like notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotextMessageInfo {
    /// The message's type tag.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Server-assigned ID.
    pub id: String,
    /// The containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The acting user, viewer-relative.
    pub creator: RelativeUserInfo,
    /// Creation timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The entity-encoded rendering.
    pub robotext: String,
}

/// The text package a notification is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifTexts {
    /// Single-line form for collapsed presentation.
    pub merged: String,
    /// Notification body.
    pub body: String,
    /// Notification title, usually the thread name.
    pub title: String,
    /// Prefix to prepend to the body when the platform separates
    /// title and body, usually the sender's name.
    pub prefix: Option<String>,
}
