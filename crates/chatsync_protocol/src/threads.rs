//! Thread payload shapes and the thread-facing wire calls.

use crate::messages::RawMessageInfo;
use crate::updates::UpdatesResult;
use crate::users::{RelativeUserInfo, UserInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A role within a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    /// Server-assigned role ID.
    pub id: String,
    /// Role name ("Admins", "Members", ...).
    pub name: String,
    /// Whether new members land in this role.
    pub is_default: bool,
}

/// A thread member as the server represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Server-assigned user ID.
    pub id: String,
    /// The member's role ID, absent once they have left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The server-shaped representation of a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawThreadInfo {
    /// Server-assigned thread ID, string-encoded on the wire.
    pub id: String,
    /// Thread type tag.
    #[serde(rename = "type")]
    pub thread_type: i32,
    /// Thread name, absent for unnamed threads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Thread description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color, hex-encoded without the leading `#`.
    pub color: String,
    /// Creation timestamp, milliseconds since the epoch.
    pub creation_time: u64,
    /// Parent thread, when this is a subthread.
    #[serde(
        rename = "parentThreadID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_thread_id: Option<String>,
    /// Current membership.
    #[serde(default)]
    pub members: Vec<MemberInfo>,
    /// Roles keyed by role ID.
    #[serde(default)]
    pub roles: HashMap<String, RoleInfo>,
}

/// A thread resolved for display, with viewer-relative members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInfo {
    /// Server-assigned thread ID.
    pub id: String,
    /// Thread type tag.
    #[serde(rename = "type")]
    pub thread_type: i32,
    /// Thread name, absent for unnamed threads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The name to render, derived from the name or the member list.
    pub ui_name: String,
    /// Display color, hex-encoded without the leading `#`.
    pub color: String,
    /// Parent thread, when this is a subthread.
    #[serde(
        rename = "parentThreadID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_thread_id: Option<String>,
    /// Members resolved relative to the viewer.
    #[serde(default)]
    pub members: Vec<RelativeUserInfo>,
    /// Roles keyed by role ID.
    #[serde(default)]
    pub roles: HashMap<String, RoleInfo>,
}

impl ThreadInfo {
    /// Whether this thread renders as a group chat rather than a DM.
    pub fn is_group_chat(&self) -> bool {
        self.members.len() > 2
    }
}

/// The subset of thread fields a settings change may touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadChanges {
    /// New thread type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub thread_type: Option<i32>,
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New parent thread.
    #[serde(
        rename = "parentThreadID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_thread_id: Option<String>,
    /// Users to add.
    #[serde(
        rename = "newMemberIDs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub new_member_ids: Option<Vec<String>>,
}

impl ThreadChanges {
    /// Whether any field is actually being changed.
    pub fn is_empty(&self) -> bool {
        self.thread_type.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.parent_thread_id.is_none()
            && self.new_member_ids.is_none()
    }
}

/// Request body for the `update_thread` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateThreadRequest {
    /// Thread to change.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The changes to apply.
    pub changes: ThreadChanges,
}

/// Response body shared by the thread-mutation wire calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThreadResponse {
    /// State updates the mutation produced.
    pub updates_result: UpdatesResult,
    /// System messages the mutation produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
}

/// Request body for the `create_thread` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThreadRequest {
    /// Thread type tag.
    #[serde(rename = "type")]
    pub thread_type: i32,
    /// Thread name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Thread description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Parent thread, when creating a subthread.
    #[serde(
        rename = "parentThreadID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_thread_id: Option<String>,
    /// Users to add at creation, besides the creator.
    #[serde(rename = "initialMemberIDs", default)]
    pub initial_member_ids: Vec<String>,
}

/// Response body for the `create_thread` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThreadResponse {
    /// The server-assigned thread ID.
    #[serde(rename = "newThreadID")]
    pub new_thread_id: String,
    /// State updates the creation produced.
    pub updates_result: UpdatesResult,
    /// System messages the creation produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
    /// Users referenced by the new thread.
    #[serde(default)]
    pub user_infos: Vec<UserInfo>,
}
