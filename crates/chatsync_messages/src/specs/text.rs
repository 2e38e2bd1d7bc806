//! Spec for plain text messages.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::utils::notif_thread_name;
use crate::wrong_variant;
use chatsync_protocol::{MessageType, RawMessageInfo, RawTextMessageInfo, ThreadInfo};

/// `MessageType::Text`.
pub(crate) struct TextMessageSpec;

impl MessageSpec for TextMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        match raw {
            RawMessageInfo::Text(info) => Some(info.text.clone()),
            other => wrong_variant!("text", other),
        }
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let text = row.content.clone().ok_or_else(|| SpecError::MissingContent {
            id: row.id.clone(),
            message_type: MessageType::Text.tag(),
        })?;
        Ok(RawMessageInfo::Text(RawTextMessageInfo {
            id: Some(row.id.clone()),
            local_id: row.local_id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            text,
        }))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        let RawMessageInfo::Text(info) = raw else {
            wrong_variant!("text", raw);
        };
        let creator = ctx.known_user(&info.creator_id)?;
        Some(MessageInfo::Text {
            id: info.id.clone(),
            local_id: info.local_id.clone(),
            thread_id: info.thread_id.clone(),
            creator,
            time: info.time,
            text: info.text.clone(),
        })
    }

    fn robotext(
        &self,
        _raw: &RawMessageInfo,
        _ctx: &MessageContext<'_>,
        _thread_info: Option<&ThreadInfo>,
    ) -> Option<String> {
        None
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        // Batches arrive most recent first; only the newest message's
        // text is rendered.
        let MessageInfo::Text { text, creator, .. } = infos.first()? else {
            return None;
        };
        let title = notif_thread_name(params.thread_info);
        // DMs show the bare text; anything with its own identity names
        // the sender in the merged line.
        if params.thread_info.is_group_chat() || params.thread_info.name.is_some() {
            let prefix = creator.display_name().to_string();
            Some(NotifTexts {
                merged: format!("{prefix}: {text}"),
                body: text.clone(),
                title,
                prefix: Some(prefix),
            })
        } else {
            Some(NotifTexts {
                merged: text.clone(),
                body: text.clone(),
                title,
                prefix: None,
            })
        }
    }

    fn starts_thread(&self) -> bool {
        true
    }

    fn included_in_replies_count(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_protocol::{RelativeUserInfo, UserInfo};
    use std::collections::HashMap;

    fn raw_text(text: &str) -> RawMessageInfo {
        RawMessageInfo::Text(RawTextMessageInfo {
            id: Some("9001".into()),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "86".into(),
            time: 1000,
            text: text.into(),
        })
    }

    fn thread(name: Option<&str>, member_count: usize) -> ThreadInfo {
        ThreadInfo {
            id: "42".into(),
            thread_type: 3,
            name: name.map(Into::into),
            ui_name: name.unwrap_or("alice").into(),
            color: "aa4b4b".into(),
            parent_thread_id: None,
            members: (0..member_count)
                .map(|i| RelativeUserInfo::other(i.to_string(), format!("user{i}")))
                .collect(),
            roles: HashMap::new(),
        }
    }

    #[test]
    fn row_round_trip_preserves_text() {
        let spec = TextMessageSpec;
        let raw = raw_text("hello there");
        let row = MessageRow {
            id: "9001".into(),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "86".into(),
            message_type: MessageType::Text,
            time: 1000,
            content: spec.message_content(&raw),
        };
        assert_eq!(spec.raw_message_info_from_row(&row).unwrap(), raw);
    }

    proptest::proptest! {
        #[test]
        fn row_round_trip_for_any_text(text in ".*", time in 0u64..u64::MAX) {
            let spec = TextMessageSpec;
            let raw = RawMessageInfo::Text(RawTextMessageInfo {
                id: Some("9001".into()),
                local_id: Some("local7".into()),
                thread_id: "42".into(),
                creator_id: "86".into(),
                time,
                text: text.clone(),
            });
            let row = MessageRow {
                id: "9001".into(),
                local_id: Some("local7".into()),
                thread_id: "42".into(),
                creator_id: "86".into(),
                message_type: MessageType::Text,
                time,
                content: spec.message_content(&raw),
            };
            proptest::prop_assert_eq!(spec.raw_message_info_from_row(&row).unwrap(), raw);
        }
    }

    #[test]
    fn missing_content_is_an_error() {
        let spec = TextMessageSpec;
        let row = MessageRow {
            id: "9001".into(),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "86".into(),
            message_type: MessageType::Text,
            time: 1000,
            content: None,
        };
        assert!(matches!(
            spec.raw_message_info_from_row(&row),
            Err(SpecError::MissingContent { .. })
        ));
    }

    #[test]
    fn unknown_creator_is_unrenderable() {
        let spec = TextMessageSpec;
        let users = HashMap::new();
        let ctx = MessageContext {
            viewer_id: "85",
            user_infos: &users,
        };
        assert!(spec.create_message_info(&raw_text("hi"), &ctx).is_none());
    }

    #[test]
    fn group_chat_notif_names_the_sender() {
        let spec = TextMessageSpec;
        let users: HashMap<String, UserInfo> =
            [("86".to_string(), UserInfo::new("86", "karl"))].into();
        let ctx = MessageContext {
            viewer_id: "85",
            user_infos: &users,
        };
        let info = spec.create_message_info(&raw_text("hi all"), &ctx).unwrap();

        let group = thread(Some("reading group"), 4);
        let texts = spec
            .notification_texts(
                std::slice::from_ref(&info),
                NotifTextsParams {
                    thread_info: &group,
                },
            )
            .unwrap();
        assert_eq!(texts.merged, "karl: hi all");
        assert_eq!(texts.title, "reading group");
        assert_eq!(texts.prefix.as_deref(), Some("karl"));

        let dm = thread(None, 2);
        let texts = spec
            .notification_texts(
                std::slice::from_ref(&info),
                NotifTextsParams { thread_info: &dm },
            )
            .unwrap();
        assert_eq!(texts.merged, "hi all");
        assert_eq!(texts.prefix, None);
    }

    #[test]
    fn notification_batch_renders_the_first_message() {
        let spec = TextMessageSpec;
        let users: HashMap<String, UserInfo> =
            [("86".to_string(), UserInfo::new("86", "karl"))].into();
        let ctx = MessageContext {
            viewer_id: "85",
            user_infos: &users,
        };
        let newest = spec.create_message_info(&raw_text("newest"), &ctx).unwrap();
        let oldest = spec.create_message_info(&raw_text("oldest"), &ctx).unwrap();

        // Most recent first, like the batches notification delivery
        // hands over.
        let texts = spec
            .notification_texts(
                &[newest, oldest],
                NotifTextsParams {
                    thread_info: &thread(None, 2),
                },
            )
            .unwrap();
        assert_eq!(texts.body, "newest");
    }
}
