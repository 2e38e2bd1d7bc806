//! Thread mutation actions.

use super::{action_types, convert_updates_result_inbound, fetch_json, ActionTypes};
use crate::error::SyncResult;
use crate::transport::ApiClient;
use chatsync_protocol::{
    convert_calendar_query, convert_new_thread_request, convert_raw_message_infos,
    convert_thread_id, convert_update_thread_request, CalendarQuery, ConversionDirection,
    NewThreadRequest, NewThreadResponse, UpdateThreadRequest, UpdateThreadResponse,
};
use serde::Serialize;

action_types!(NEW_THREAD, "NEW_THREAD");
action_types!(CHANGE_THREAD_SETTINGS, "CHANGE_THREAD_SETTINGS");
action_types!(REMOVE_USERS_FROM_THREAD, "REMOVE_USERS_FROM_THREAD");
action_types!(CHANGE_THREAD_MEMBER_ROLES, "CHANGE_THREAD_MEMBER_ROLES");
action_types!(JOIN_THREAD, "JOIN_THREAD");
action_types!(LEAVE_THREAD, "LEAVE_THREAD");
action_types!(DELETE_THREAD, "DELETE_THREAD");

#[derive(Serialize)]
struct ThreadTarget<'a> {
    #[serde(rename = "threadID")]
    thread_id: &'a str,
}

#[derive(Serialize)]
struct MemberChangeRequest<'a> {
    #[serde(rename = "threadID")]
    thread_id: &'a str,
    #[serde(rename = "memberIDs")]
    member_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinThreadRequest<'a> {
    #[serde(rename = "threadID")]
    thread_id: &'a str,
    calendar_query: CalendarQuery,
}

fn convert_thread_response_inbound(mut response: UpdateThreadResponse) -> UpdateThreadResponse {
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    response
}

/// Creates a new thread via the `create_thread` wire call.
pub async fn new_thread<C: ApiClient>(
    client: &C,
    request: NewThreadRequest,
) -> SyncResult<NewThreadResponse> {
    let request = convert_new_thread_request(ConversionDirection::ClientToServer, request);
    let mut response: NewThreadResponse = fetch_json(client, "create_thread", &request).await?;
    response.new_thread_id =
        convert_thread_id(ConversionDirection::ServerToClient, &response.new_thread_id);
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    Ok(response)
}

/// Applies settings changes via the `update_thread` wire call.
pub async fn change_thread_settings<C: ApiClient>(
    client: &C,
    request: UpdateThreadRequest,
) -> SyncResult<UpdateThreadResponse> {
    let request = convert_update_thread_request(ConversionDirection::ClientToServer, request);
    let response = fetch_json(client, "update_thread", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

/// Removes members via the `remove_members` wire call.
pub async fn remove_users_from_thread<C: ApiClient>(
    client: &C,
    thread_id: &str,
    member_ids: &[String],
) -> SyncResult<UpdateThreadResponse> {
    let request = MemberChangeRequest {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        member_ids,
        role: None,
    };
    let response = fetch_json(client, "remove_members", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

/// Reassigns member roles via the `update_role` wire call.
pub async fn change_thread_member_roles<C: ApiClient>(
    client: &C,
    thread_id: &str,
    member_ids: &[String],
    role: &str,
) -> SyncResult<UpdateThreadResponse> {
    let request = MemberChangeRequest {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        member_ids,
        role: Some(role),
    };
    let response = fetch_json(client, "update_role", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

/// Joins a thread via the `join_thread` wire call.
///
/// The calendar query rides along so the server can include the
/// thread's entries in the resulting updates.
pub async fn join_thread<C: ApiClient>(
    client: &C,
    thread_id: &str,
    calendar_query: CalendarQuery,
) -> SyncResult<UpdateThreadResponse> {
    let request = JoinThreadRequest {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
        calendar_query: convert_calendar_query(ConversionDirection::ClientToServer, calendar_query),
    };
    let response = fetch_json(client, "join_thread", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

/// Leaves a thread via the `leave_thread` wire call.
pub async fn leave_thread<C: ApiClient>(
    client: &C,
    thread_id: &str,
) -> SyncResult<UpdateThreadResponse> {
    let request = ThreadTarget {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
    };
    let response = fetch_json(client, "leave_thread", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

/// Deletes a thread via the `delete_thread` wire call.
pub async fn delete_thread<C: ApiClient>(
    client: &C,
    thread_id: &str,
) -> SyncResult<UpdateThreadResponse> {
    let request = ThreadTarget {
        thread_id: &convert_thread_id(ConversionDirection::ClientToServer, thread_id),
    };
    let response = fetch_json(client, "delete_thread", &request).await?;
    Ok(convert_thread_response_inbound(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockApiClient;
    use chatsync_protocol::ThreadChanges;

    fn empty_updates() -> serde_json::Value {
        serde_json::json!({ "newUpdates": [], "currentAsOf": 5000 })
    }

    #[tokio::test]
    async fn update_thread_sends_changes_under_thread_id() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "updatesResult": empty_updates(),
            "newMessageInfos": [],
        })));
        let request = UpdateThreadRequest {
            thread_id: "42".into(),
            changes: ThreadChanges {
                name: Some("hangouts".into()),
                ..ThreadChanges::default()
            },
        };
        change_thread_settings(&client, request).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let (endpoint, body) = &calls[0];
        assert_eq!(endpoint, "update_thread");
        assert_eq!(body["threadID"], "42");
        assert_eq!(body["changes"]["name"], "hangouts");
        assert!(body["changes"].get("color").is_none());
    }

    #[tokio::test]
    async fn role_change_carries_member_ids_and_role() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "updatesResult": empty_updates(),
        })));
        let members = vec!["85".to_string(), "86".to_string()];
        change_thread_member_roles(&client, "42", &members, "87")
            .await
            .unwrap();

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "update_role");
        assert_eq!(body["memberIDs"], serde_json::json!(["85", "86"]));
        assert_eq!(body["role"], "87");
    }

    #[tokio::test]
    async fn join_thread_rides_the_calendar_query() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "updatesResult": empty_updates(),
        })));
        let query = CalendarQuery {
            start_date: "2020-01-01".into(),
            end_date: "2020-02-01".into(),
            filters: vec![],
        };
        join_thread(&client, "42", query).await.unwrap();

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "join_thread");
        assert_eq!(body["threadID"], "42");
        assert_eq!(body["calendarQuery"]["startDate"], "2020-01-01");
    }

    #[tokio::test]
    async fn create_thread_returns_new_thread_id() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "newThreadID": "90210",
            "updatesResult": empty_updates(),
            "newMessageInfos": [],
            "userInfos": [],
        })));
        let request = NewThreadRequest {
            thread_type: 4,
            name: Some("hangouts".into()),
            description: None,
            color: Some("b8753d".into()),
            parent_thread_id: None,
            initial_member_ids: vec!["86".into()],
        };
        let response = new_thread(&client, request).await.unwrap();
        assert_eq!(response.new_thread_id, "90210");
        assert_eq!(client.calls()[0].0, "create_thread");
    }
}
