//! Focus and read-status actions.

use super::{action_types, fetch_json, ActionTypes};
use crate::error::SyncResult;
use crate::transport::ApiClient;
use chatsync_protocol::{
    convert_activity_updates, convert_thread_id, ActivityUpdate, ConversionDirection,
    SetThreadUnreadStatusRequest, SetThreadUnreadStatusResponse, UpdateActivityRequest,
    UpdateActivityResponse,
};

action_types!(UPDATE_ACTIVITY, "UPDATE_ACTIVITY");
action_types!(SET_THREAD_UNREAD_STATUS, "SET_THREAD_UNREAD_STATUS");

/// Reports focus transitions via the `update_activity` wire call.
pub async fn update_activity<C: ApiClient>(
    client: &C,
    updates: Vec<ActivityUpdate>,
) -> SyncResult<UpdateActivityResponse> {
    let request = UpdateActivityRequest {
        updates: convert_activity_updates(ConversionDirection::ClientToServer, updates),
    };
    let mut response: UpdateActivityResponse =
        fetch_json(client, "update_activity", &request).await?;
    response.unfocused_to_unread = response
        .unfocused_to_unread
        .iter()
        .map(|id| convert_thread_id(ConversionDirection::ServerToClient, id))
        .collect();
    Ok(response)
}

/// Flips a thread's unread flag via the `set_thread_unread_status`
/// wire call.
pub async fn set_thread_unread_status<C: ApiClient>(
    client: &C,
    request: SetThreadUnreadStatusRequest,
) -> SyncResult<SetThreadUnreadStatusResponse> {
    let request = SetThreadUnreadStatusRequest {
        thread_id: convert_thread_id(ConversionDirection::ClientToServer, &request.thread_id),
        ..request
    };
    fetch_json(client, "set_thread_unread_status", &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockApiClient;

    #[tokio::test]
    async fn activity_updates_keep_their_order() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({ "unfocusedToUnread": ["42"] })));
        let updates = vec![
            ActivityUpdate {
                focus: false,
                thread_id: "42".into(),
                latest_message: Some("9001".into()),
            },
            ActivityUpdate {
                focus: true,
                thread_id: "43".into(),
                latest_message: None,
            },
        ];
        let response = update_activity(&client, updates).await.unwrap();
        assert_eq!(response.unfocused_to_unread, vec!["42".to_string()]);

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "update_activity");
        assert_eq!(body["updates"][0]["threadID"], "42");
        assert_eq!(body["updates"][0]["focus"], false);
        assert_eq!(body["updates"][1]["threadID"], "43");
    }

    #[tokio::test]
    async fn unread_status_round_trips_the_reset_flag() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({ "resetToUnread": true })));
        let request = SetThreadUnreadStatusRequest {
            thread_id: "42".into(),
            unread: false,
            latest_message: Some("9001".into()),
        };
        let response = set_thread_unread_status(&client, request).await.unwrap();
        assert!(response.reset_to_unread);

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "set_thread_unread_status");
        assert_eq!(body["unread"], false);
        assert_eq!(body["latestMessage"], "9001");
    }
}
