//! One `MessageSpec` implementation per message type.

pub(crate) mod entry_ops;
pub(crate) mod multimedia;
pub(crate) mod text;
pub(crate) mod thread_ops;
pub(crate) mod unsupported;

use crate::info::{MessageInfo, NotifTexts, RobotextMessageInfo};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::utils::{notif_thread_name, stripped_robotext};
use chatsync_protocol::RawMessageInfo;
use serde::de::DeserializeOwned;

/// Parses a row's required content column as the type's JSON payload.
pub(crate) fn parse_content<T: DeserializeOwned>(row: &MessageRow) -> Result<T, SpecError> {
    let content = row.content.as_ref().ok_or_else(|| SpecError::MissingContent {
        id: row.id.clone(),
        message_type: row.message_type.tag(),
    })?;
    serde_json::from_str(content).map_err(|source| SpecError::MalformedContent {
        id: row.id.clone(),
        source,
    })
}

/// Resolves a system message by rendering its robotext.
///
/// Shared by every robotext spec's `create_message_info`. Returns
/// `None` when the creator is unknown to the user store or the raw
/// message has no server ID; system messages are never optimistic, so
/// either would mean a corrupt store.
pub(crate) fn robotext_message_info(
    spec: &dyn MessageSpec,
    raw: &RawMessageInfo,
    ctx: &MessageContext<'_>,
) -> Option<MessageInfo> {
    let id = raw.id()?.to_string();
    let creator = ctx.known_user(raw.creator_id())?;
    let robotext = spec.robotext(raw, ctx, None)?;
    Some(MessageInfo::Robotext(RobotextMessageInfo {
        message_type: raw.message_type(),
        id,
        thread_id: raw.thread_id().to_string(),
        creator,
        time: raw.time(),
        robotext,
    }))
}

/// Builds notification texts from the most recent resolved system
/// message, the batch's first element.
///
/// Shared by every robotext spec's `notification_texts`: the body is
/// the flattened robotext, the title is the thread name, and there is
/// no sender prefix since the actor is already part of the sentence.
pub(crate) fn robotext_notification_texts(
    infos: &[MessageInfo],
    params: NotifTextsParams<'_>,
) -> Option<NotifTexts> {
    let MessageInfo::Robotext(newest) = infos.first()? else {
        return None;
    };
    let body = stripped_robotext(&newest.robotext);
    Some(NotifTexts {
        merged: body.clone(),
        body,
        title: notif_thread_name(params.thread_info),
        prefix: None,
    })
}
