//! Answers server-pushed requests.

use crate::dispatch::{IntentDispatcher, StateIntent};
use crate::socket::SyncSocket;
use crate::transport::{ConnectionStatus, SocketTransport};
use chatsync_protocol::{
    convert_client_response, convert_server_request, CalendarQuery, ClientMessagePayload,
    ClientResponse, ConversionDirection, ServerMessageType, ServerRequest,
};
use tracing::{debug, warn};

/// The collaborator that knows how to answer server requests.
///
/// The engine owns delivery and retry; what goes into each answer
/// (platform identity, state hashes, initial activity) is client
/// state this seam provides.
pub trait ResponseSource: Send + Sync {
    /// The calendar query currently active on this client.
    fn calendar_query(&self) -> CalendarQuery;

    /// Computes the answers for a batch of requests, in client
    /// namespace. Requests the client cannot answer are simply
    /// omitted.
    fn client_responses(&self, requests: &[ServerRequest]) -> Vec<ClientResponse>;
}

/// Handles one inbound `Requests` frame.
///
/// The requests are converted to the client namespace and dispatched
/// for bookkeeping regardless of what happens next. When the batch
/// produces answers, they go out as one `Responses` frame whose
/// acknowledgement is another `Requests` frame. Delivery failure is
/// retried exactly once, and only when the failure is ambiguous (see
/// [`SyncError::ambiguous_for_response_retry`]) and the socket is
/// still `Connected`; anything else is logged and dropped, since the
/// server will push the requests again if it still needs answers.
///
/// [`SyncError::ambiguous_for_response_retry`]:
/// crate::error::SyncError::ambiguous_for_response_retry
pub async fn handle_server_requests<T: SocketTransport>(
    socket: &SyncSocket<T>,
    dispatcher: &dyn IntentDispatcher,
    source: &dyn ResponseSource,
    server_requests: Vec<ServerRequest>,
) {
    if server_requests.is_empty() {
        return;
    }
    let requests: Vec<ServerRequest> = server_requests
        .into_iter()
        .map(|request| convert_server_request(ConversionDirection::ServerToClient, request))
        .collect();
    dispatcher.dispatch(StateIntent::ProcessServerRequests {
        requests: requests.clone(),
        calendar_query: source.calendar_query(),
    });

    let responses = source.client_responses(&requests);
    if responses.is_empty() {
        return;
    }
    let client_responses: Vec<ClientResponse> = responses
        .into_iter()
        .map(|response| convert_client_response(ConversionDirection::ClientToServer, response))
        .collect();
    let payload = ClientMessagePayload::Responses { client_responses };

    let Err(error) = socket.call(payload.clone(), ServerMessageType::Requests).await else {
        return;
    };
    if !error.ambiguous_for_response_retry() || socket.status() != ConnectionStatus::Connected {
        warn!(%error, "response delivery failed; server will re-request");
        return;
    }
    debug!(%error, "response delivery ambiguous, retrying once");
    if let Err(retry_error) = socket.call(payload, ServerMessageType::Requests).await {
        warn!(%retry_error, "response delivery failed after retry");
    }
}
