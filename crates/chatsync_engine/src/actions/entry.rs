//! Calendar entry actions.

use super::{action_types, convert_updates_result_inbound, fetch_json, ActionTypes};
use crate::error::SyncResult;
use crate::transport::ApiClient;
use chatsync_protocol::{
    convert_calendar_query, convert_raw_message_infos, convert_thread_id, ConversionDirection,
    CreateEntryRequest, CreateEntryResponse, DeleteEntryRequest, DeleteEntryResponse,
    RestoreEntryRequest, RestoreEntryResponse, SaveEntryRequest, SaveEntryResponse,
};

action_types!(CREATE_ENTRY, "CREATE_ENTRY");
action_types!(SAVE_ENTRY, "SAVE_ENTRY");
action_types!(DELETE_ENTRY, "DELETE_ENTRY");
action_types!(RESTORE_ENTRY, "RESTORE_ENTRY");

/// Creates an entry via the `create_entry` wire call.
pub async fn create_entry<C: ApiClient>(
    client: &C,
    request: CreateEntryRequest,
) -> SyncResult<CreateEntryResponse> {
    let request = CreateEntryRequest {
        thread_id: convert_thread_id(ConversionDirection::ClientToServer, &request.thread_id),
        calendar_query: convert_calendar_query(
            ConversionDirection::ClientToServer,
            request.calendar_query,
        ),
        ..request
    };
    let mut response: CreateEntryResponse = fetch_json(client, "create_entry", &request).await?;
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    Ok(response)
}

/// Edits an entry's text via the `save_entry` wire call.
pub async fn save_entry<C: ApiClient>(
    client: &C,
    request: SaveEntryRequest,
) -> SyncResult<SaveEntryResponse> {
    let request = SaveEntryRequest {
        calendar_query: convert_calendar_query(
            ConversionDirection::ClientToServer,
            request.calendar_query,
        ),
        ..request
    };
    let mut response: SaveEntryResponse = fetch_json(client, "save_entry", &request).await?;
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    Ok(response)
}

/// Deletes an entry via the `delete_entry` wire call.
pub async fn delete_entry<C: ApiClient>(
    client: &C,
    request: DeleteEntryRequest,
) -> SyncResult<DeleteEntryResponse> {
    let request = DeleteEntryRequest {
        calendar_query: convert_calendar_query(
            ConversionDirection::ClientToServer,
            request.calendar_query,
        ),
        ..request
    };
    let mut response: DeleteEntryResponse = fetch_json(client, "delete_entry", &request).await?;
    response.thread_id =
        convert_thread_id(ConversionDirection::ServerToClient, &response.thread_id);
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    Ok(response)
}

/// Restores a deleted entry via the `restore_entry` wire call.
pub async fn restore_entry<C: ApiClient>(
    client: &C,
    request: RestoreEntryRequest,
) -> SyncResult<RestoreEntryResponse> {
    let request = RestoreEntryRequest {
        calendar_query: convert_calendar_query(
            ConversionDirection::ClientToServer,
            request.calendar_query,
        ),
        ..request
    };
    let mut response: RestoreEntryResponse = fetch_json(client, "restore_entry", &request).await?;
    response.new_message_infos = convert_raw_message_infos(
        ConversionDirection::ServerToClient,
        response.new_message_infos,
    );
    response.updates_result = convert_updates_result_inbound(response.updates_result);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockApiClient;
    use chatsync_protocol::{CalendarFilter, CalendarQuery};

    fn window() -> CalendarQuery {
        CalendarQuery {
            start_date: "2020-01-01".into(),
            end_date: "2020-02-01".into(),
            filters: vec![CalendarFilter::Threads {
                thread_ids: vec!["42".into()],
            }],
        }
    }

    #[tokio::test]
    async fn create_entry_resolves_the_server_id() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "entryID": "777",
            "newMessageInfos": [],
            "updatesResult": { "newUpdates": [], "currentAsOf": 5000 },
        })));
        let request = CreateEntryRequest {
            text: "pick up groceries".into(),
            date: "2020-01-15".into(),
            thread_id: "42".into(),
            local_id: Some("local3".into()),
            timestamp: 4000,
            calendar_query: window(),
        };
        let response = create_entry(&client, request).await.unwrap();
        assert_eq!(response.entry_id, "777");

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "create_entry");
        assert_eq!(body["threadID"], "42");
        assert_eq!(body["localID"], "local3");
        assert_eq!(body["calendarQuery"]["filters"][0]["threadIDs"][0], "42");
    }

    #[tokio::test]
    async fn save_entry_sends_prev_text() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "entryID": "777",
            "updatesResult": { "newUpdates": [], "currentAsOf": 5000 },
        })));
        let request = SaveEntryRequest {
            entry_id: "777".into(),
            text: "pick up groceries and milk".into(),
            prev_text: "pick up groceries".into(),
            timestamp: 4100,
            calendar_query: window(),
        };
        save_entry(&client, request).await.unwrap();

        let (endpoint, body) = &client.calls()[0];
        assert_eq!(endpoint, "save_entry");
        assert_eq!(body["prevText"], "pick up groceries");
    }

    #[tokio::test]
    async fn concurrent_edit_rejection_surfaces_as_server_error() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({ "error": "concurrent_modification" })));
        let request = DeleteEntryRequest {
            entry_id: "777".into(),
            prev_text: "pick up groceries".into(),
            timestamp: 4200,
            calendar_query: window(),
        };
        let result = delete_entry(&client, request).await;
        match result {
            Err(crate::SyncError::Server(message)) => {
                assert_eq!(message, "concurrent_modification");
            }
            other => panic!("expected server error, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn restore_entry_returns_the_updates() {
        let client = MockApiClient::new();
        client.push_response(Ok(serde_json::json!({
            "newMessageInfos": [],
            "updatesResult": { "newUpdates": [], "currentAsOf": 5200 },
        })));
        let request = RestoreEntryRequest {
            entry_id: "777".into(),
            timestamp: 4300,
            calendar_query: window(),
        };
        let response = restore_entry(&client, request).await.unwrap();
        assert_eq!(response.updates_result.current_as_of, 5200);
        assert_eq!(client.calls()[0].0, "restore_entry");
    }
}
