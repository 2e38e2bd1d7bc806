//! Dispatch from `MessageType` to its spec.

use crate::spec::MessageSpec;
use crate::specs::entry_ops::{
    CREATE_ENTRY_SPEC, DELETE_ENTRY_SPEC, EDIT_ENTRY_SPEC, RESTORE_ENTRY_SPEC,
};
use crate::specs::multimedia::{IMAGES_SPEC, MULTIMEDIA_SPEC};
use crate::specs::text::TextMessageSpec;
use crate::specs::thread_ops::{
    AddMembersMessageSpec, ChangeRoleMessageSpec, ChangeSettingsMessageSpec,
    CreateSubThreadMessageSpec, CreateThreadMessageSpec, JoinThreadMessageSpec,
    LeaveThreadMessageSpec, RemoveMembersMessageSpec,
};
use crate::specs::unsupported::UnsupportedMessageSpec;
use chatsync_protocol::{MessageType, RawMessageInfo};

/// The spec for a message type.
///
/// The match is exhaustive; adding a `MessageType` variant without a
/// spec will not compile.
pub fn message_spec(message_type: MessageType) -> &'static dyn MessageSpec {
    match message_type {
        MessageType::Text => &TextMessageSpec,
        MessageType::CreateThread => &CreateThreadMessageSpec,
        MessageType::AddMembers => &AddMembersMessageSpec,
        MessageType::CreateSubThread => &CreateSubThreadMessageSpec,
        MessageType::ChangeSettings => &ChangeSettingsMessageSpec,
        MessageType::RemoveMembers => &RemoveMembersMessageSpec,
        MessageType::ChangeRole => &ChangeRoleMessageSpec,
        MessageType::LeaveThread => &LeaveThreadMessageSpec,
        MessageType::JoinThread => &JoinThreadMessageSpec,
        MessageType::CreateEntry => &CREATE_ENTRY_SPEC,
        MessageType::EditEntry => &EDIT_ENTRY_SPEC,
        MessageType::DeleteEntry => &DELETE_ENTRY_SPEC,
        MessageType::RestoreEntry => &RESTORE_ENTRY_SPEC,
        MessageType::Unsupported => &UnsupportedMessageSpec,
        MessageType::Images => &IMAGES_SPEC,
        MessageType::Multimedia => &MULTIMEDIA_SPEC,
    }
}

/// Recovers a shimmed message through its owning type's unshim path.
///
/// Anything other than an `Unsupported` wrapper, or a wrapper whose
/// payload this build still cannot parse, passes through unchanged.
pub fn unshim_message_info(raw: RawMessageInfo) -> RawMessageInfo {
    let RawMessageInfo::Unsupported(info) = &raw else {
        return raw;
    };
    let Some(tag) = info
        .unsupported_message_info
        .get("type")
        .and_then(serde_json::Value::as_u64)
    else {
        return raw;
    };
    let Some(message_type) = u8::try_from(tag).ok().and_then(MessageType::from_tag) else {
        return raw;
    };
    match message_spec(message_type).unshim_message_info(&raw) {
        Some(recovered) => recovered,
        None => raw,
    }
}
