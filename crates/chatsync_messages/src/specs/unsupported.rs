//! Spec for the `Unsupported` placeholder type.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::specs::{parse_content, robotext_message_info, robotext_notification_texts};
use crate::utils::robotext_for_user;
use crate::wrong_variant;
use chatsync_protocol::{RawMessageInfo, RawUnsupportedMessageInfo, ThreadInfo};
use serde::{Deserialize, Serialize};

/// `MessageType::Unsupported`.
///
/// Carries a pre-rendered robotext plus the original message as an
/// opaque payload, so an upgraded client can recover it through the
/// owning type's unshim path.
pub(crate) struct UnsupportedMessageSpec;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsupportedContent {
    robotext: String,
    dont_prefix_creator: bool,
    unsupported_message_info: serde_json::Value,
}

impl MessageSpec for UnsupportedMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::Unsupported(info) => Some(
                serde_json::to_string(&UnsupportedContent {
                    robotext: info.robotext.clone(),
                    dont_prefix_creator: info.dont_prefix_creator,
                    unsupported_message_info: info.unsupported_message_info.clone(),
                })
                .unwrap_or_default(),
            ),
            other => wrong_variant!("unsupported", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let content: UnsupportedContent = parse_content(row)?;
        Ok(RawMessageInfo::Unsupported(RawUnsupportedMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            robotext: content.robotext,
            dont_prefix_creator: content.dont_prefix_creator,
            unsupported_message_info: content.unsupported_message_info,
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
        let RawMessageInfo::Unsupported(info) = raw else {
            wrong_variant!("unsupported", raw);
        };
        if info.dont_prefix_creator {
            return Some(info.robotext.clone());
        }
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        Some(format!("{creator} {}", info.robotext))
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }

    fn generates_notifs(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_protocol::UserInfo;
    use std::collections::HashMap;

    fn raw_unsupported(dont_prefix_creator: bool) -> RawMessageInfo {
        RawMessageInfo::Unsupported(RawUnsupportedMessageInfo {
            id: "9001".into(),
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            robotext: "sent a multimedia message".into(),
            dont_prefix_creator,
            unsupported_message_info: serde_json::json!({"type": 15}),
        })
    }

    #[test]
    fn robotext_prefixes_creator_unless_told_not_to() {
        let users: HashMap<String, UserInfo> =
            [("85".to_string(), UserInfo::new("85", "ashoat"))].into();
        let ctx = MessageContext {
            viewer_id: "99",
            user_infos: &users,
        };

        let robotext = UnsupportedMessageSpec
            .robotext(&raw_unsupported(false), &ctx, None)
            .unwrap();
        assert_eq!(robotext, "<ashoat|u85> sent a multimedia message");

        let robotext = UnsupportedMessageSpec
            .robotext(&raw_unsupported(true), &ctx, None)
            .unwrap();
        assert_eq!(robotext, "sent a multimedia message");
    }

    #[test]
    fn row_round_trip_keeps_opaque_payload() {
        let spec = UnsupportedMessageSpec;
        let raw = raw_unsupported(false);
        let row = MessageRow {
            id: "9001".into(),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "85".into(),
            message_type: chatsync_protocol::MessageType::Unsupported,
            time: 1000,
            content: spec.message_content(&raw),
        };
        assert_eq!(spec.raw_message_info_from_row(&row).unwrap(), raw);
    }
}
