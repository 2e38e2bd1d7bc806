//! Message send and fetch actions.

use super::{action_types, fetch_json, ActionTypes};
use crate::error::SyncResult;
use crate::transport::ApiClient;
use chatsync_protocol::{
    convert_raw_message_infos, convert_thread_id, ConversionDirection, FetchMessagesRequest,
    FetchMessagesResponse, SendMessageResponse,
};
use serde::Serialize;
use std::collections::HashMap;

action_types!(SEND_TEXT_MESSAGE, "SEND_TEXT_MESSAGE");
action_types!(SEND_MULTIMEDIA_MESSAGE, "SEND_MULTIMEDIA_MESSAGE");
action_types!(FETCH_MESSAGES_BEFORE_CURSOR, "FETCH_MESSAGES_BEFORE_CURSOR");
action_types!(FETCH_MOST_RECENT_MESSAGES, "FETCH_MOST_RECENT_MESSAGES");

/// A confirmed send, carrying both halves of the identity swap: the
/// temporary ID the optimistic message was rendered under and the
/// server-assigned ID that replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageResult {
    /// Server-assigned message ID.
    pub id: String,
    /// Server-assigned timestamp, milliseconds since the epoch.
    pub time: u64,
    /// The client-generated ID this send was issued under.
    pub local_id: String,
    /// The containing thread, client namespace.
    pub thread_id: String,
}

#[derive(Serialize)]
struct SendTextMessageRequest<'a> {
    #[serde(rename = "threadID")]
    thread_id: &'a str,
    #[serde(rename = "localID")]
    local_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct SendMultimediaMessageRequest<'a> {
    #[serde(rename = "threadID")]
    thread_id: &'a str,
    #[serde(rename = "localID")]
    local_id: &'a str,
    #[serde(rename = "mediaIDs")]
    media_ids: &'a [String],
}

/// Sends a text message via the `create_text_message` wire call.
pub async fn send_text_message<C: ApiClient>(
    client: &C,
    thread_id: &str,
    local_id: &str,
    text: &str,
) -> SyncResult<SendMessageResult> {
    let request = SendTextMessageRequest {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        local_id,
        text,
    };
    let response: SendMessageResponse = fetch_json(client, "create_text_message", &request).await?;
    Ok(SendMessageResult {
        id: response.new_message_info.id,
        time: response.new_message_info.time,
        local_id: local_id.to_string(),
        thread_id: thread_id.to_string(),
    })
}

/// Sends an already-uploaded media batch via the
/// `create_multimedia_message` wire call.
pub async fn send_multimedia_message<C: ApiClient>(
    client: &C,
    thread_id: &str,
    local_id: &str,
    media_ids: &[String],
) -> SyncResult<SendMessageResult> {
    let request = SendMultimediaMessageRequest {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        local_id,
        media_ids,
    };
    let response: SendMessageResponse =
        fetch_json(client, "create_multimedia_message", &request).await?;
    Ok(SendMessageResult {
        id: response.new_message_info.id,
        time: response.new_message_info.time,
        local_id: local_id.to_string(),
        thread_id: thread_id.to_string(),
    })
}

fn convert_fetch_response_inbound(mut response: FetchMessagesResponse) -> FetchMessagesResponse {
    response.raw_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.raw_message_infos,
    );
    response.truncation_statuses = response
        .truncation_statuses
        .into_iter()
        .map(|(thread_id, status)| {
            (
                convert_thread_id(ConversionDirection::ServerToClient, &thread_id),
                status,
            )
        })
        .collect();
    response
}

/// Fetches the window of messages older than a cursor via the
/// `fetch_messages` wire call.
pub async fn fetch_messages_before_cursor<C: ApiClient>(
    client: &C,
    thread_id: &str,
    before_message_id: &str,
) -> SyncResult<FetchMessagesResponse> {
    let mut cursors = HashMap::new();
    cursors.insert(
        convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        Some(before_message_id.to_string()),
    );
    let request = FetchMessagesRequest { cursors };
    let response = fetch_json(client, "fetch_messages", &request).await?;
    Ok(convert_fetch_response_inbound(response))
}

/// Fetches the most recent window of messages via the `fetch_messages`
/// wire call.
pub async fn fetch_most_recent_messages<C: ApiClient>(
    client: &C,
    thread_id: &str,
) -> SyncResult<FetchMessagesResponse> {
    let mut cursors = HashMap::new();
    cursors.insert(
        convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        None,
    );
    let request = FetchMessagesRequest { cursors };
    let response = fetch_json(client, "fetch_messages", &request).await?;
    Ok(convert_fetch_response_inbound(response))
}
