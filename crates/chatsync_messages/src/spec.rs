//! The per-type behavior contract.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use chatsync_protocol::{
    PlatformDetails, RawMessageInfo, RelativeUserInfo, ThreadInfo, UserInfo,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while parsing a stored row into a raw message.
#[derive(Error, Debug)]
pub enum SpecError {
    /// The row has no content column but the type requires one.
    #[error("message {id} of type {message_type} has no content")]
    MissingContent {
        /// The offending row's ID.
        id: String,
        /// Its type tag.
        message_type: u8,
    },

    /// The content column does not parse as the type's payload.
    #[error("message {id} content is malformed: {source}")]
    MalformedContent {
        /// The offending row's ID.
        id: String,
        /// The parse failure.
        source: serde_json::Error,
    },
}

/// User resolution context for turning raw messages into display
/// shapes.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// The logged-in user.
    pub viewer_id: &'a str,
    /// Known users, keyed by ID.
    pub user_infos: &'a HashMap<String, UserInfo>,
}

impl MessageContext<'_> {
    /// Resolves a user ID, or `None` when the user store has never
    /// seen it.
    pub fn known_user(&self, id: &str) -> Option<RelativeUserInfo> {
        let user = self.user_infos.get(id)?;
        Some(RelativeUserInfo {
            id: user.id.clone(),
            username: user.username.clone(),
            is_viewer: user.id == self.viewer_id,
        })
    }

    /// Resolves a user ID, falling back to a nameless entry for users
    /// the store has never seen.
    pub fn relative_user(&self, id: &str) -> RelativeUserInfo {
        self.known_user(id).unwrap_or_else(|| RelativeUserInfo {
            id: id.to_string(),
            username: None,
            is_viewer: id == self.viewer_id,
        })
    }
}

/// Context for notification text rendering.
#[derive(Debug, Clone, Copy)]
pub struct NotifTextsParams<'a> {
    /// The thread the notifying messages belong to.
    pub thread_info: &'a ThreadInfo,
}

/// Everything the client needs to know about one message type.
///
/// Exactly one implementation exists per
/// [`MessageType`](chatsync_protocol::MessageType); dispatch goes
/// through [`message_spec`](crate::message_spec). Methods taking a
/// `RawMessageInfo` require the variant matching the spec's type;
/// handing a spec the wrong variant is a caller bug and panics.
pub trait MessageSpec: Send + Sync {
    /// The type-specific payload to store in the row's content column,
    /// or `None` for types that keep everything in shared columns.
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String>;

    /// Reconstructs the raw message from a stored row.
    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError>;

    /// Resolves a raw message for display, or `None` when it cannot be
    /// rendered (for example, its creator is unresolvable).
    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo>;

    /// Renders the entity-encoded system text for this message, or
    /// `None` for user-authored types.
    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        thread_info: Option<&ThreadInfo>,
    ) -> Option<String>;

    /// Builds notification texts from a batch of resolved messages of
    /// this type, all in the same thread, most recent first.
    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts>;

    /// A key under which successive notifications for this message
    /// collapse, or `None` to never collapse.
    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        let _ = raw;
        None
    }

    /// Whether messages of this type generate notifications at all.
    fn generates_notifs(&self) -> bool {
        true
    }

    /// Whether a message of this type can seed a new side thread.
    fn starts_thread(&self) -> bool {
        false
    }

    /// Whether messages of this type count toward a thread's reply
    /// count.
    fn included_in_replies_count(&self) -> bool {
        false
    }

    /// Degrades this message for a client below the type's minimum
    /// supported code version, or returns it unchanged.
    fn shim_unsupported_message_info(
        &self,
        raw: RawMessageInfo,
        platform_details: &PlatformDetails,
    ) -> RawMessageInfo {
        let _ = platform_details;
        raw
    }

    /// Recovers the original message from a shimmed `Unsupported`
    /// wrapper, or `None` when this spec did not produce it.
    fn unshim_message_info(&self, raw: &RawMessageInfo) -> Option<RawMessageInfo> {
        let _ = raw;
        None
    }
}

/// Panic message for a raw message handed to the wrong spec.
#[macro_export]
#[doc(hidden)]
macro_rules! wrong_variant {
    ($spec:literal, $raw:expr) => {
        panic!(
            concat!($spec, " spec received a {:?} message"),
            $raw.message_type()
        )
    };
}
