//! Specs for media messages, including version shimming.
//!
//! `Images` (type 14) predates `Multimedia` (type 15); both carry a
//! media list and differ only in minimum supported client version.
//! Clients below a type's minimum receive an `Unsupported` wrapper
//! instead, and recover the original via the unshim path once
//! upgraded.

use crate::info::{MessageInfo, NotifTexts};
use crate::row::MessageRow;
use crate::spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
use crate::utils::notif_thread_name;
use chatsync_protocol::{
    Dimensions, Media, MessageType, PlatformDetails, RawImagesMessageInfo, RawMediaMessageInfo,
    RawMessageInfo, RawUnsupportedMessageInfo, ThreadInfo,
};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

/// Oldest client version that understands `Images` messages.
const IMAGES_MIN_CODE_VERSION: u64 = 30;
/// Oldest client version that understands `Multimedia` messages.
const MULTIMEDIA_MIN_CODE_VERSION: u64 = 62;

/// Dimensions for the handful of historical uploads recorded before
/// the server stored dimensions, keyed by upload ID.
pub fn pre_dimension_uploads() -> &'static HashMap<String, Dimensions> {
    static TABLE: OnceLock<HashMap<String, Dimensions>> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            ("156642", 1440, 1080),
            ("156649", 720, 803),
            ("156794", 720, 803),
            ("156877", 574, 454),
        ]
        .into_iter()
        .map(|(id, width, height)| (id.to_string(), Dimensions { width, height }))
        .collect()
    })
}

fn supports(platform_details: &PlatformDetails, min_code_version: u64) -> bool {
    // Web clients ship continuously and never carry a code version.
    if platform_details.platform == "web" {
        return true;
    }
    platform_details
        .code_version
        .is_some_and(|version| version >= min_code_version)
}

fn media_preview(media: &[Media]) -> &'static str {
    let mut photos = false;
    let mut videos = false;
    for item in media {
        match item {
            Media::Photo { .. } => photos = true,
            Media::Video { .. } => videos = true,
        }
    }
    match (photos, videos) {
        (true, false) if media.len() == 1 => "sent you a photo",
        (true, false) => "sent you photos",
        (false, true) if media.len() == 1 => "sent you a video",
        (false, true) => "sent you videos",
        _ => "sent you multimedia",
    }
}

fn restore_dimensions(media: Vec<Media>) -> Vec<Media> {
    media
        .into_iter()
        .map(|item| match item {
            Media::Photo {
                id,
                uri,
                dimensions: None,
            } => {
                let dimensions = pre_dimension_uploads().get(&id).copied();
                if dimensions.is_none() {
                    warn!(upload_id = %id, "photo with no recorded dimensions");
                }
                Media::Photo {
                    id,
                    uri,
                    dimensions,
                }
            }
            other => other,
        })
        .collect()
}

/// `MessageType::Images` or `MessageType::Multimedia`.
pub(crate) struct MediaMessageSpec {
    message_type: MessageType,
    min_code_version: u64,
}

pub(crate) static IMAGES_SPEC: MediaMessageSpec = MediaMessageSpec {
    message_type: MessageType::Images,
    min_code_version: IMAGES_MIN_CODE_VERSION,
};
pub(crate) static MULTIMEDIA_SPEC: MediaMessageSpec = MediaMessageSpec {
    message_type: MessageType::Multimedia,
    min_code_version: MULTIMEDIA_MIN_CODE_VERSION,
};

struct MediaFields<'a> {
    id: &'a Option<String>,
    local_id: &'a Option<String>,
    thread_id: &'a str,
    creator_id: &'a str,
    time: u64,
    media: &'a [Media],
}

impl MediaMessageSpec {
    fn fields<'a>(&self, raw: &'a RawMessageInfo) -> MediaFields<'a> {
        assert_eq!(
            raw.message_type(),
            self.message_type,
            "media spec for {:?} received a {:?} message",
            self.message_type,
            raw.message_type(),
        );
        match raw {
            RawMessageInfo::Images(info) => MediaFields {
                id: &info.id,
                local_id: &info.local_id,
                thread_id: &info.thread_id,
                creator_id: &info.creator_id,
                time: info.time,
                media: &info.media,
            },
            RawMessageInfo::Multimedia(info) => MediaFields {
                id: &info.id,
                local_id: &info.local_id,
                thread_id: &info.thread_id,
                creator_id: &info.creator_id,
                time: info.time,
                media: &info.media,
            },
            _ => unreachable!(),
        }
    }

    fn wrap(
        &self,
        row: &MessageRow,
        media: Vec<Media>,
    ) -> RawMessageInfo {
        match self.message_type {
            MessageType::Images => RawMessageInfo::Images(RawImagesMessageInfo {
                id: Some(row.id.clone()),
                local_id: row.local_id.clone(),
                thread_id: row.thread_id.clone(),
                creator_id: row.creator_id.clone(),
                time: row.time,
                media,
            }),
            MessageType::Multimedia => RawMessageInfo::Multimedia(RawMediaMessageInfo {
                id: Some(row.id.clone()),
                local_id: row.local_id.clone(),
                thread_id: row.thread_id.clone(),
                creator_id: row.creator_id.clone(),
                time: row.time,
                media,
            }),
            _ => unreachable!(),
        }
    }
}

impl MessageSpec for MediaMessageSpec {
    fn message_content(&self, raw: &RawMessageInfo) -> Option<String> {
        let fields = self.fields(raw);
        Some(serde_json::to_string(fields.media).unwrap_or_default())
    }

    fn raw_message_info_from_row(&self, row: &MessageRow) -> Result<RawMessageInfo, SpecError> {
        let media: Vec<Media> = super::parse_content(row)?;
        Ok(self.wrap(row, restore_dimensions(media)))
    }

    fn create_message_info(
        &self,
        raw: &RawMessageInfo,
        ctx: &MessageContext<'_>,
    ) -> Option<MessageInfo> {
        let fields = self.fields(raw);
        let creator = ctx.known_user(fields.creator_id)?;
        Some(MessageInfo::Media {
            id: fields.id.clone(),
            local_id: fields.local_id.clone(),
            thread_id: fields.thread_id.to_string(),
            creator,
            time: fields.time,
            media: fields.media.to_vec(),
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
        let MessageInfo::Media { creator, media, .. } = infos.first()? else {
            return None;
        };
        let prefix = creator.display_name().to_string();
        let body = media_preview(media).to_string();
        Some(NotifTexts {
            merged: format!("{prefix} {body}"),
            body,
            title: notif_thread_name(params.thread_info),
            prefix: Some(prefix),
        })
    }

    fn notification_collapse_key(&self, raw: &RawMessageInfo) -> Option<String> {
        let fields = self.fields(raw);
        // Images and Multimedia share one key, so a sender's mixed
        // media batch collapses into a single notification.
        Some(format!(
            "multimedia|{}|{}",
            fields.thread_id, fields.creator_id,
        ))
    }

    fn starts_thread(&self) -> bool {
        true
    }

    fn included_in_replies_count(&self) -> bool {
        true
    }

    fn shim_unsupported_message_info(
        &self,
        raw: RawMessageInfo,
        platform_details: &PlatformDetails,
    ) -> RawMessageInfo {
        if supports(platform_details, self.min_code_version) {
            return raw;
        }
        let fields = self.fields(&raw);
        let Some(id) = fields.id.clone() else {
            // Optimistic sends never cross the shim boundary.
            return raw;
        };
        let shimmed = RawUnsupportedMessageInfo {
            id,
            thread_id: fields.thread_id.to_string(),
            creator_id: fields.creator_id.to_string(),
            time: fields.time,
            robotext: "sent a multimedia message".to_string(),
            dont_prefix_creator: false,
            unsupported_message_info: serde_json::to_value(&raw)
                .unwrap_or(serde_json::Value::Null),
        };
        RawMessageInfo::Unsupported(shimmed)
    }

    fn unshim_message_info(&self, raw: &RawMessageInfo) -> Option<RawMessageInfo> {
        let RawMessageInfo::Unsupported(info) = raw else {
            return None;
        };
        let original: RawMessageInfo =
            serde_json::from_value(info.unsupported_message_info.clone()).ok()?;
        if original.message_type() != self.message_type {
            return None;
        }
        Some(match original {
            RawMessageInfo::Images(mut inner) => {
                inner.media = restore_dimensions(inner.media);
                RawMessageInfo::Images(inner)
            }
            RawMessageInfo::Multimedia(mut inner) => {
                inner.media = restore_dimensions(inner.media);
                RawMessageInfo::Multimedia(inner)
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_images(media: Vec<Media>) -> RawMessageInfo {
        RawMessageInfo::Images(RawImagesMessageInfo {
            id: Some("9001".into()),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 1000,
            media,
        })
    }

    fn photo(id: &str) -> Media {
        Media::Photo {
            id: id.into(),
            uri: format!("https://cdn.example/{id}.jpg"),
            dimensions: Some(Dimensions {
                width: 100,
                height: 200,
            }),
        }
    }

    #[test]
    fn old_client_gets_shimmed() {
        let platform = PlatformDetails {
            platform: "ios".into(),
            code_version: Some(25),
            state_version: None,
        };
        let shimmed = IMAGES_SPEC.shim_unsupported_message_info(raw_images(vec![photo("1")]), &platform);
        assert_eq!(shimmed.message_type(), MessageType::Unsupported);
    }

    #[test]
    fn new_client_is_not_shimmed() {
        let platform = PlatformDetails {
            platform: "ios".into(),
            code_version: Some(30),
            state_version: None,
        };
        let raw = raw_images(vec![photo("1")]);
        let shimmed = IMAGES_SPEC.shim_unsupported_message_info(raw.clone(), &platform);
        assert_eq!(shimmed, raw);
    }

    #[test]
    fn web_is_never_shimmed() {
        let platform = PlatformDetails {
            platform: "web".into(),
            code_version: None,
            state_version: None,
        };
        let shimmed = MULTIMEDIA_SPEC.shim_unsupported_message_info(
            RawMessageInfo::Multimedia(RawMediaMessageInfo {
                id: Some("9001".into()),
                local_id: None,
                thread_id: "42".into(),
                creator_id: "85".into(),
                time: 1000,
                media: vec![photo("1")],
            }),
            &platform,
        );
        assert_ne!(shimmed.message_type(), MessageType::Unsupported);
    }

    #[test]
    fn shim_then_unshim_recovers_original() {
        let platform = PlatformDetails {
            platform: "android".into(),
            code_version: Some(10),
            state_version: None,
        };
        let raw = raw_images(vec![photo("1"), photo("2")]);
        let shimmed = IMAGES_SPEC.shim_unsupported_message_info(raw.clone(), &platform);
        let recovered = IMAGES_SPEC.unshim_message_info(&shimmed).unwrap();
        assert_eq!(recovered, raw);
    }

    #[test]
    fn unshim_fills_pre_dimension_uploads() {
        let platform = PlatformDetails {
            platform: "android".into(),
            code_version: Some(10),
            state_version: None,
        };
        let raw = raw_images(vec![Media::Photo {
            id: "156649".into(),
            uri: "https://cdn.example/156649.jpg".into(),
            dimensions: None,
        }]);
        let shimmed = IMAGES_SPEC.shim_unsupported_message_info(raw, &platform);
        let recovered = IMAGES_SPEC.unshim_message_info(&shimmed).unwrap();
        let RawMessageInfo::Images(info) = recovered else {
            panic!("expected images message");
        };
        assert_eq!(
            info.media[0].dimensions(),
            Some(Dimensions {
                width: 720,
                height: 803,
            }),
        );
    }

    #[test]
    fn both_media_types_collapse_under_one_key() {
        let images = raw_images(vec![photo("1")]);
        let multimedia = RawMessageInfo::Multimedia(RawMediaMessageInfo {
            id: Some("9002".into()),
            local_id: None,
            thread_id: "42".into(),
            creator_id: "85".into(),
            time: 2000,
            media: vec![photo("2")],
        });
        let key = IMAGES_SPEC.notification_collapse_key(&images);
        assert_eq!(key, Some("multimedia|42|85".to_string()));
        assert_eq!(key, MULTIMEDIA_SPEC.notification_collapse_key(&multimedia));

        let elsewhere = RawMessageInfo::Multimedia(RawMediaMessageInfo {
            id: Some("9003".into()),
            local_id: None,
            thread_id: "43".into(),
            creator_id: "85".into(),
            time: 2000,
            media: vec![photo("3")],
        });
        assert_ne!(key, MULTIMEDIA_SPEC.notification_collapse_key(&elsewhere));
    }

    #[test]
    fn media_preview_wording() {
        assert_eq!(media_preview(&[photo("1")]), "sent you a photo");
        assert_eq!(media_preview(&[photo("1"), photo("2")]), "sent you photos");
        let video = Media::Video {
            id: "3".into(),
            uri: "https://cdn.example/3.mp4".into(),
            dimensions: None,
        };
        assert_eq!(
            media_preview(&[photo("1"), video]),
            "sent you multimedia",
        );
    }
}
