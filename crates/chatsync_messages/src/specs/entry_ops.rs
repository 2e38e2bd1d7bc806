//! Specs for the calendar-entry system messages.
//!
//! The four entry operations share one payload shape and differ only
//! in their verb, so a single parameterized spec covers all of them.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::specs::{parse_content, robotext_message_info, robotext_notification_texts};
use crate::utils::robotext_for_user;
use chatsync_protocol::{MessageType, RawEntryOpMessageInfo, RawMessageInfo, ThreadInfo};
use serde::{Deserialize, Serialize};

/// One of `CreateEntry`, `EditEntry`, `DeleteEntry`, `RestoreEntry`.
pub(crate) struct EntryOpMessageSpec {
    message_type: MessageType,
    verb: &'static str,
}

pub(crate) static CREATE_ENTRY_SPEC: EntryOpMessageSpec = EntryOpMessageSpec {
    message_type: MessageType::CreateEntry,
    verb: "created",
};
pub(crate) static EDIT_ENTRY_SPEC: EntryOpMessageSpec = EntryOpMessageSpec {
    message_type: MessageType::EditEntry,
    verb: "updated",
};
pub(crate) static DELETE_ENTRY_SPEC: EntryOpMessageSpec = EntryOpMessageSpec {
    message_type: MessageType::DeleteEntry,
    verb: "deleted",
};
pub(crate) static RESTORE_ENTRY_SPEC: EntryOpMessageSpec = EntryOpMessageSpec {
    message_type: MessageType::RestoreEntry,
    verb: "restored",
};

#[derive(Serialize, Deserialize)]
struct EntryOpContent {
    #[serde(rename = "entryID")]
    entry_id: String,
    date: String,
    text: String,
}

impl EntryOpMessageSpec {
    fn payload<'a>(&self, raw: &'a RawMessageInfo) -> &'a RawEntryOpMessageInfo {
        assert_eq!(
            raw.message_type(),
            self.message_type,
            "{} spec received a {:?} message",
            self.verb,
            raw.message_type(),
        );
        match raw {
            RawMessageInfo::CreateEntry(info)
            | RawMessageInfo::EditEntry(info)
            | RawMessageInfo::DeleteEntry(info)
            | RawMessageInfo::RestoreEntry(info) => info,
            _ => unreachable!(),
        }
    }

    fn wrap(&self, info: RawEntryOpMessageInfo) -> RawMessageInfo {
        match self.message_type {
            MessageType::CreateEntry => RawMessageInfo::CreateEntry(info),
            MessageType::EditEntry => RawMessageInfo::EditEntry(info),
            MessageType::DeleteEntry => RawMessageInfo::DeleteEntry(info),
            MessageType::RestoreEntry => RawMessageInfo::RestoreEntry(info),
            _ => unreachable!(),
        }
    }
}

impl MessageSpec for EntryOpMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        let info = self.payload(raw);
        Some(
            serde_json::to_string(&EntryOpContent {
                entry_id: info.entry_id.clone(),
                date: info.date.clone(),
                text: info.text.clone(),
            })
            .unwrap_or_default(),
        )
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let content: EntryOpContent = parse_content(row)?;
        Ok(self.wrap(RawEntryOpMessageInfo {
            id: row.id.clone(),
            thread_id: row.thread_id.clone(),
            creator_id: row.creator_id.clone(),
            time: row.time,
            entry_id: content.entry_id,
            date: content.date,
            text: content.text,
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
        let info = self.payload(raw);
        let creator = robotext_for_user(&ctx.relative_user(&info.creator_id));
        let scheduled = format!("an event scheduled for {}", info.date);
        Some(if self.message_type == MessageType::EditEntry {
            format!(
                "{creator} {} the text of {scheduled}: \"{}\"",
                self.verb, info.text,
            )
        } else {
            format!("{creator} {} {scheduled}: \"{}\"", self.verb, info.text)
        })
    }

    fn notification_texts(
        &self,
        infos: &[MessageInfo],
        params: NotifTextsParams<'_>,
    ) -> Option<NotifTexts> {
        robotext_notification_texts(infos, params)
    }
}
