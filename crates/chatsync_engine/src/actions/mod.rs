//! The action layer: typed wrappers over the server's JSON commands.
//!
//! Every action converts outbound IDs to the server namespace, issues
//! one wire command through the [`ApiClient`](crate::ApiClient) seam,
//! converts the response back, and exposes a
//! `{ started, success, failed }` [`ActionTypes`] triple the external
//! store keys its lifecycle bookkeeping on.

pub mod activity;
pub mod entry;
pub mod message;
pub mod thread;

use crate::error::{SyncError, SyncResult};
use crate::transport::ApiClient;
use chatsync_protocol::{convert_update_infos, ConversionDirection, UpdatesResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The dispatch type triple an action's lifecycle is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTypes {
    /// Emitted when the action begins.
    pub started: &'static str,
    /// Emitted with the typed result on success.
    pub success: &'static str,
    /// Emitted with the error on failure.
    pub failed: &'static str,
}

macro_rules! action_types {
    ($name:ident, $base:literal) => {
        /// Lifecycle triple for this action.
        pub const $name: ActionTypes = ActionTypes {
            started: concat!($base, "_STARTED"),
            success: concat!($base, "_SUCCESS"),
            failed: concat!($base, "_FAILED"),
        };
    };
}
pub(crate) use action_types;

/// Issues one command and decodes its response.
///
/// The server wraps responses in a `{ success | error }` envelope with
/// the payload fields at the top level; an `error` field maps to
/// [`SyncError::Server`] with the code verbatim.
pub(crate) async fn fetch_json<C, Req, Resp>(
    client: &C,
    endpoint: &str,
    request: &Req,
) -> SyncResult<Resp>
where
    C: ApiClient,
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let request = serde_json::to_value(request)
        .map_err(|error| SyncError::Protocol(format!("unencodable {endpoint} request: {error}")))?;
    let response = client.call(endpoint, request).await?;
    if let Some(error) = response.get("error").and_then(serde_json::Value::as_str) {
        return Err(SyncError::Server(error.to_string()));
    }
    serde_json::from_value(response)
        .map_err(|error| SyncError::Protocol(format!("malformed {endpoint} response: {error}")))
}

/// Converts an inbound updates envelope to the client namespace.
pub(crate) fn convert_updates_result_inbound(mut updates_result: UpdatesResult) -> UpdatesResult {
    updates_result.new_updates = convert_update_infos(
        ConversionDirection::ServerToClient,
        updates_result.new_updates,
    );
    updates_result
}
