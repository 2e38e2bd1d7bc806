//! Activity payload shapes and the activity-facing wire calls.

use serde::{Deserialize, Serialize};

/// One focus/unfocus transition for a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityUpdate {
    /// Whether the thread gained or lost focus.
    pub focus: bool,
    /// The thread in question.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The newest message the client had seen when unfocusing.
    #[serde(
        rename = "latestMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_message: Option<String>,
}

/// Request body for the `update_activity` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    /// The transitions, oldest first.
    pub updates: Vec<ActivityUpdate>,
}

/// Response body for the `update_activity` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityResponse {
    /// Threads that went unread because the client unfocused them.
    pub unfocused_to_unread: Vec<String>,
}

/// Request body for the `set_thread_unread_status` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetThreadUnreadStatusRequest {
    /// The thread in question.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// The desired unread state.
    pub unread: bool,
    /// The newest message the client has seen.
    #[serde(
        rename = "latestMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_message: Option<String>,
}

/// Response body for the `set_thread_unread_status` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetThreadUnreadStatusResponse {
    /// Whether the server reset the thread to unread despite the request.
    pub reset_to_unread: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_update_wire_shape() {
        let update = ActivityUpdate {
            focus: false,
            thread_id: "42".into(),
            latest_message: Some("9001".into()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "focus": false,
                "threadID": "42",
                "latestMessage": "9001",
            })
        );
    }

    #[test]
    fn latest_message_omitted_when_absent() {
        let update = ActivityUpdate {
            focus: true,
            thread_id: "42".into(),
            latest_message: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("latestMessage").is_none());
    }
}
