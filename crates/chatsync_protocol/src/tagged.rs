//! Helpers for JSON unions discriminated by a numeric `type` field.
//!
//! The server's tagged unions put the discriminator inline with the
//! payload fields (`{ "type": 6, ... }`), which serde's derive cannot
//! express for integer tags. Each union derives plain payload structs
//! and splices the tag in a hand-written `Serialize`/`Deserialize`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Serializes `payload` as a JSON object with `"type": tag` spliced in.
pub(crate) fn serialize_tagged<S, T>(
    tag: u8,
    payload: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: Serialize,
{
    let mut value = serde_json::to_value(payload).map_err(serde::ser::Error::custom)?;
    match &mut value {
        serde_json::Value::Object(map) => {
            map.insert("type".to_string(), serde_json::Value::from(tag));
        }
        _ => {
            return Err(serde::ser::Error::custom(
                "tagged payload must serialize to a JSON object",
            ))
        }
    }
    value.serialize(serializer)
}

/// A raw tagged value: the extracted discriminator plus the full object.
pub(crate) struct TaggedValue {
    pub tag: u8,
    pub value: serde_json::Value,
}

/// Pulls the numeric `type` discriminator out of an incoming object.
pub(crate) fn deserialize_tagged<'de, D>(deserializer: D) -> Result<TaggedValue, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let tag = value
        .get("type")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| serde::de::Error::custom("missing numeric `type` tag"))?;
    let tag =
        u8::try_from(tag).map_err(|_| serde::de::Error::custom("`type` tag out of range"))?;
    Ok(TaggedValue { tag, value })
}

/// Decodes the payload struct for a variant; the leftover `type` key is
/// ignored by the derived deserializer.
pub(crate) fn payload<T, E>(value: serde_json::Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: serde::de::Error,
{
    serde_json::from_value(value).map_err(serde::de::Error::custom)
}
