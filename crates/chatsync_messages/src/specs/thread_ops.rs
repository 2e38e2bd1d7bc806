//! Specs for the thread-lifecycle system messages.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::specs::{parse_content, robotext_message_info, robotext_notification_texts};
use crate::utils::{encoded_thread_entity, join_result, robotext_for_user};
use crate::wrong_variant;
use chatsync_protocol::{
    InitialThreadState, RawChangeRoleMessageInfo, RawChangeSettingsMessageInfo,
    RawCreateThreadMessageInfo, RawMembershipMessageInfo, RawMessageInfo, RawSubThreadMessageInfo,
    RawThreadOpMessageInfo, ThreadInfo,
};
use serde::{Deserialize, Serialize};

fn users_robotext(ctx: &MessageContext<'_>, user_ids: &[String]) -> String {
    let names: Vec<String> = user_ids
        .iter()
        .map(|id| robotext_for_user(&ctx.relative_user(id)))
        .collect();
    join_result(&names)
}

fn thread_entity(thread_id: &str, thread_info: Option<&ThreadInfo>) -> String {
    let text = thread_info
        .and_then(|info| info.name.as_deref())
        .unwrap_or("this thread");
    encoded_thread_entity(thread_id, text)
}

/// `MessageType::CreateThread`.
pub(crate) struct CreateThreadMessageSpec;

impl MessageSpec for CreateThreadMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::CreateThread(info) => {
                Some(serde_json::to_string(&info.initial_thread_state).unwrap_or_default())
            }
            other => wrong_variant!("create_thread", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let initial_thread_state: InitialThreadState = parse_content(row)?;
        Ok(RawMessageInfo::CreateThread(RawCreateThreadMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            initial_thread_state,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::CreateThread(info) = raw else {
            wrong_variant!("create_thread", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        let text = info
            .initial_thread_state
            .name
            .as_deref()
            .or_else(|| thread_info.and_then(|t| t.name.as_deref()))
            .map_or_else(
                || "this thread".to_string(),
                |name| format!("\"{name}\""),
            );
        Some(format!(
            "{creator} created {}",
            encoded_thread_entity(&info.thread_id, &text),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }
}

/// `MessageType::AddMembers`.
pub(crate) struct AddMembersMessageSpec;

impl MessageSpec for AddMembersMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::AddMembers(info) => {
                Some(serde_json::to_string(&info.user_ids).unwrap_or_default())
            }
            other => wrong_variant!("add_members", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let user_ids: Vec<String> = parse_content(row)?;
        Ok(RawMessageInfo::AddMembers(RawMembershipMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            user_ids,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        _thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::AddMembers(info) = raw else {
            wrong_variant!("add_members", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!(
            "{creator} added {}",
            users_robotext(ctx, &info.user_ids),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }

    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        Some(format!(
            "add_members|{}|{}",
            raw.thread_id(),
            raw.creator_id(),
        ))
    }
}

/// `MessageType::RemoveMembers`.
pub(crate) struct RemoveMembersMessageSpec;

impl MessageSpec for RemoveMembersMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::RemoveMembers(info) => {
                Some(serde_json::to_string(&info.user_ids).unwrap_or_default())
            }
            other => wrong_variant!("remove_members", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let user_ids: Vec<String> = parse_content(row)?;
        Ok(RawMessageInfo::RemoveMembers(RawMembershipMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            user_ids,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        _thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::RemoveMembers(info) = raw else {
            wrong_variant!("remove_members", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!(
            "{creator} removed {}",
            users_robotext(ctx, &info.user_ids),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }
}

/// `MessageType::CreateSubThread`.
pub(crate) struct CreateSubThreadMessageSpec;

impl MessageSpec for CreateSubThreadMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::CreateSubThread(info) => Some(info.child_thread_id.clone()),
            other => wrong_variant!("create_sub_thread", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let child_thread_id =
            row.content.clone().ok_or_else(|| SpecError::MissingContent {
                id: row.id.clone(),
                message_type: row.message_type.tag(),
            })?;
        Ok(RawMessageInfo::CreateSubThread(RawSubThreadMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            child_thread_id,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        _thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::CreateSubThread(info) = raw else {
            wrong_variant!("create_sub_thread", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!(
            "{creator} created {}",
            encoded_thread_entity(&info.child_thread_id, "a subthread"),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }
}

/// `MessageType::ChangeSettings`.
pub(crate) struct ChangeSettingsMessageSpec;

#[derive(Serialize, Deserialize)]
struct ChangeSettingsContent {
    field: String,
    value: serde_json::Value,
}

impl MessageSpec for ChangeSettingsMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::ChangeSettings(info) => Some(
                serde_json::to_string(&ChangeSettingsContent {
                    field: info.field.clone(),
                    value: info.value.clone(),
                })
                .unwrap_or_default(),
            ),
            other => wrong_variant!("change_settings", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let content: ChangeSettingsContent = parse_content(row)?;
        Ok(RawMessageInfo::ChangeSettings(RawChangeSettingsMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            field: content.field,
            value: content.value,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        _thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::ChangeSettings(info) = raw else {
            wrong_variant!("change_settings", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        if info.field == "color" {
            return Some(format!("{creator} changed the thread color"));
        }
        let value = match info.value.as_str() {
            Some(text) => text.to_string(),
            None => info.value.to_string(),
        };
        Some(format!(
            "{creator} updated the thread {} to \"{value}\"",
            info.field,
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }
}

/// `MessageType::ChangeRole`.
pub(crate) struct ChangeRoleMessageSpec;

#[derive(Serialize, Deserialize)]
struct ChangeRoleContent {
    #[serde(rename = "userIDs")]
    user_ids: Vec<String>,
    #[serde(rename = "newRole")]
    new_role: String,
}

impl MessageSpec for ChangeRoleMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::ChangeRole(info) => Some(
                serde_json::to_string(&ChangeRoleContent {
                    user_ids: info.user_ids.clone(),
                    new_role: info.new_role.clone(),
                })
                .unwrap_or_default(),
            ),
            other => wrong_variant!("change_role", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let content: ChangeRoleContent = parse_content(row)?;
        Ok(RawMessageInfo::ChangeRole(RawChangeRoleMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            user_ids: content.user_ids,
            new_role: content.new_role,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::ChangeRole(info) = raw else {
            wrong_variant!("change_role", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        // Role IDs only resolve to names through the thread's role
        // table; without it the raw ID is shown.
        let role = thread_info
            .and_then(|t| t.roles.get(&info.new_role))
            .map_or_else(|| info.new_role.clone(), |role| role.name.clone());
        Some(format!(
            "{creator} changed the role of {} to \"{role}\"",
            users_robotext(ctx, &info.user_ids),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }

    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        let RawMessageInfo::ChangeRole(info) = raw else {
            wrong_variant!("change_role", raw);
        };
        // Promotions to different roles must not collapse together, so
        // the target role is part of the key.
        Some(format!(
            "change_role|{}|{}|{}",
            info.thread_id, info.creator_id, info.new_role,
        ))
    }
}

/// `MessageType::LeaveThread`.
pub(crate) struct LeaveThreadMessageSpec;

impl MessageSpec for LeaveThreadMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::LeaveThread(_) => None,
            other => wrong_variant!("leave_thread", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        Ok(RawMessageInfo::LeaveThread(RawThreadOpMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::LeaveThread(info) = raw else {
            wrong_variant!("leave_thread", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!(
            "{creator} left {}",
            thread_entity(&info.thread_id, thread_info),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }

    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        Some(format!("leave_thread|{}", raw.thread_id()))
    }

    fn generates_notifs(&self) -> bool {
        false
    }
}

/// `MessageType::JoinThread`.
pub(crate) struct JoinThreadMessageSpec;

impl MessageSpec for JoinThreadMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::JoinThread(_) => None,
            other => wrong_variant!("join_thread", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        Ok(RawMessageInfo::JoinThread(RawThreadOpMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        robotext_message_info(self, raw, ctx)
    }

    fn robotext(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
        thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        let RawMessageInfo::JoinThread(info) = raw else {
            wrong_variant!("join_thread", raw);
        };
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!(
            "{creator} joined {}",
            thread_entity(&info.thread_id, thread_info),
        ))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }

    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        Some(format!("join_thread|{}", raw.thread_id()))
    }

    fn generates_notifs(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_protocol::{MessageType, UserInfo};
    use std::collections::HashMap;

    fn ctx_users() -> HashMap<String, UserInfo> {
        [
            ("85".to_string(), UserInfo::new("85", "ashoat")),
            ("86".to_string(), UserInfo::new("86", "karl")),
            ("87".to_string(), UserInfo::new("87", "varun")),
        ]
        .into()
    }

    #[test]
    fn add_members_robotext_lists_users() {
        let users = ctx_users();
        let ctx = MessageContext {
            viewer_id: "99",
            user_infos: &users,
        };
        let raw = RawMessageInfo::AddMembers(RawMembershipMessageInfo {
            id: "9001".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            user_ids: vec!["86".into(), "87".into()],
        });
        let robotext = AddMembersMessageSpec.robotext(&raw, &ctx, None).unwrap();
        assert_eq!(robotext, "<ashoat|u85> added <karl|u86> and <varun|u87>");
    }

    #[test]
    fn viewer_creator_renders_as_you() {
        let users = ctx_users();
        let ctx = MessageContext {
            viewer_id: "85",
            user_infos: &users,
        };
        let raw = RawMessageInfo::JoinThread(RawThreadOpMessageInfo {
            id: "9002".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
        });
        let robotext = JoinThreadMessageSpec.robotext(&raw, &ctx, None).unwrap();
        assert_eq!(robotext, "you joined <this thread|t42>");
    }

    #[test]
    fn membership_row_round_trip() {
        let spec = AddMembersMessageSpec;
        let raw = RawMessageInfo::AddMembers(RawMembershipMessageInfo {
            id: "9001".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            user_ids: vec!["86".into()],
        });
        let row = MessageRow {
            id: "9001".into(),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "85".into(),
            message_type: MessageType::AddMembers,
            time: 1000,
            content: spec.message_content(&raw),
        };
        assert_eq!(spec.raw_message_info_from_row(&row).unwrap(), raw);
    }

    #[test]
    fn change_settings_row_round_trip() {
        let spec = ChangeSettingsMessageSpec;
        let raw = RawMessageInfo::ChangeSettings(RawChangeSettingsMessageInfo {
            id: "9003".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            field: "name".into(),
            value: serde_json::json!("new name"),
        });
        let row = MessageRow {
            id: "9003".into(),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "85".into(),
            message_type: MessageType::ChangeSettings,
            time: 1000,
            content: spec.message_content(&raw),
        };
        assert_eq!(spec.raw_message_info_from_row(&row).unwrap(), raw);
    }

    #[test]
    fn change_role_collapse_tracks_the_target_role() {
        let promote = |id: &str, time: u64, new_role: &str| {
            RawMessageInfo::ChangeRole(RawChangeRoleMessageInfo {
                id: id.into(),
                thread_id: "42".into(),
                creator_id: "85".into(),
                time,
                user_ids: vec!["86".into()],
                new_role: new_role.into(),
            })
        };
        let to_admin = ChangeRoleMessageSpec.notification_collapse_key(&promote("9001", 1000, "88"));
        assert_eq!(to_admin, Some("change_role|42|85|88".to_string()));

        // Same promotion later collapses; a different target role
        // never does.
        assert_eq!(
            to_admin,
            ChangeRoleMessageSpec.notification_collapse_key(&promote("9002", 2000, "88")),
        );
        assert_ne!(
            to_admin,
            ChangeRoleMessageSpec.notification_collapse_key(&promote("9003", 1000, "89")),
        );
    }

    #[test]
    fn join_leave_collapse_by_thread() {
        let raw = RawMessageInfo::JoinThread(RawThreadOpMessageInfo {
            id: "9002".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
        });
        assert_eq!(
            JoinThreadMessageSpec.notification_collapse_key(&raw),
            Some("join_thread|42".to_string()),
        );
        assert!(!JoinThreadMessageSpec.generates_notifs());

        // The key ignores time but tracks the thread.
        let later = RawMessageInfo::JoinThread(RawThreadOpMessageInfo {
            id: "9005".into(),
            thread_id: "42".into(),
            creator_id: "86".into(),
            time: 2000,
        });
        assert_eq!(
            JoinThreadMessageSpec.notification_collapse_key(&raw),
            JoinThreadMessageSpec.notification_collapse_key(&later),
        );
        let elsewhere = RawMessageInfo::JoinThread(RawThreadOpMessageInfo {
            id: "9006".into(),
            thread_id: "43".into(),
            creator_id: "85".into(),
            time: 1000,
        });
        assert_ne!(
            JoinThreadMessageSpec.notification_collapse_key(&raw),
            JoinThreadMessageSpec.notification_collapse_key(&elsewhere),
        );
    }
}
