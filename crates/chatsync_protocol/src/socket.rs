//! Socket frame types for the duplex connection.

use crate::requests::{ClientResponse, ServerRequest};
use crate::updates::UpdatesPayload;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Errors produced while encoding or decoding protocol payloads.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A frame did not match any known shape.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

const CLIENT_RESPONSES: u8 = 1;
const CLIENT_PING: u8 = 3;
const CLIENT_ACK_UPDATES: u8 = 4;

const SERVER_REQUESTS: u8 = 1;
const SERVER_ERROR: u8 = 2;
const SERVER_PONG: u8 = 5;
const SERVER_UPDATES: u8 = 6;

/// The body of a client-to-server frame, before a correlation ID is
/// assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessagePayload {
    /// Batched answers to server-pushed requests.
    Responses {
        /// The responses, in server namespace.
        client_responses: Vec<ClientResponse>,
    },
    /// Connection liveness probe.
    Ping,
    /// Acknowledgement watermark for the update stream.
    AckUpdates {
        /// The acknowledged watermark.
        current_as_of: u64,
    },
}

/// A client-to-server frame: a payload plus its correlation ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSocketMessage {
    /// Connection-scoped correlation ID.
    pub id: u64,
    /// The frame body.
    pub payload: ClientMessagePayload,
}

impl ClientSocketMessage {
    /// Encodes this frame to its JSON wire form.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ClientSocketMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let frame = match &self.payload {
            ClientMessagePayload::Responses { client_responses } => json!({
                "type": CLIENT_RESPONSES,
                "id": self.id,
                "payload": { "clientResponses": client_responses },
            }),
            ClientMessagePayload::Ping => json!({
                "type": CLIENT_PING,
                "id": self.id,
                "payload": {},
            }),
            ClientMessagePayload::AckUpdates { current_as_of } => json!({
                "type": CLIENT_ACK_UPDATES,
                "id": self.id,
                "payload": { "currentAsOf": current_as_of },
            }),
        };
        frame.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClientSocketMessage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::custom("missing numeric `type` tag"))?;
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::custom("client frame missing `id`"))?;
        let payload = value.get("payload").cloned().unwrap_or(json!({}));
        let payload = match tag as u8 {
            CLIENT_RESPONSES => {
                let client_responses = payload
                    .get("clientResponses")
                    .cloned()
                    .ok_or_else(|| D::Error::custom("responses frame missing clientResponses"))?;
                ClientMessagePayload::Responses {
                    client_responses: serde_json::from_value(client_responses)
                        .map_err(D::Error::custom)?,
                }
            }
            CLIENT_PING => ClientMessagePayload::Ping,
            CLIENT_ACK_UPDATES => {
                let current_as_of = payload
                    .get("currentAsOf")
                    .and_then(serde_json::Value::as_u64)
                    .ok_or_else(|| D::Error::custom("ack frame missing currentAsOf"))?;
                ClientMessagePayload::AckUpdates { current_as_of }
            }
            other => return Err(D::Error::custom(format!("unknown client frame type {other}"))),
        };
        Ok(Self { id, payload })
    }
}

/// Discriminates server-to-client frame kinds, used by callers awaiting
/// a response of a particular kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessageType {
    /// A batch of server-pushed requests.
    Requests,
    /// A server-reported error.
    Error,
    /// Reply to a ping.
    Pong,
    /// An update envelope.
    Updates,
}

/// A server-to-client frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerSocketMessage {
    /// A batch of server-pushed requests; also acknowledges a client
    /// `Responses` frame when `response_to` is set.
    Requests {
        /// The client frame this answers, if any.
        response_to: Option<u64>,
        /// The pushed requests.
        server_requests: Vec<ServerRequest>,
    },
    /// A server-reported error for a specific client frame.
    Error {
        /// The client frame this answers, if any.
        response_to: Option<u64>,
        /// The server's error code string.
        message: String,
    },
    /// Reply to a ping.
    Pong {
        /// The ping frame this answers.
        response_to: u64,
    },
    /// An unsolicited update envelope.
    Updates {
        /// The envelope and referenced users.
        payload: UpdatesPayload,
    },
}

impl ServerSocketMessage {
    /// The frame kind.
    pub fn message_type(&self) -> ServerMessageType {
        match self {
            Self::Requests { .. } => ServerMessageType::Requests,
            Self::Error { .. } => ServerMessageType::Error,
            Self::Pong { .. } => ServerMessageType::Pong,
            Self::Updates { .. } => ServerMessageType::Updates,
        }
    }

    /// The client correlation ID this frame answers, if any.
    pub fn response_to(&self) -> Option<u64> {
        match self {
            Self::Requests { response_to, .. } | Self::Error { response_to, .. } => *response_to,
            Self::Pong { response_to } => Some(*response_to),
            Self::Updates { .. } => None,
        }
    }

    /// Decodes a frame from its JSON wire form.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Serialize for ServerSocketMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let frame = match self {
            Self::Requests {
                response_to,
                server_requests,
            } => {
                let mut frame = json!({
                    "type": SERVER_REQUESTS,
                    "payload": { "serverRequests": server_requests },
                });
                if let Some(response_to) = response_to {
                    frame["responseTo"] = json!(response_to);
                }
                frame
            }
            Self::Error {
                response_to,
                message,
            } => {
                let mut frame = json!({ "type": SERVER_ERROR, "message": message });
                if let Some(response_to) = response_to {
                    frame["responseTo"] = json!(response_to);
                }
                frame
            }
            Self::Pong { response_to } => {
                json!({ "type": SERVER_PONG, "responseTo": response_to })
            }
            Self::Updates { payload } => json!({ "type": SERVER_UPDATES, "payload": payload }),
        };
        frame.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ServerSocketMessage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::custom("missing numeric `type` tag"))?;
        let response_to = value.get("responseTo").and_then(serde_json::Value::as_u64);
        Ok(match tag as u8 {
            SERVER_REQUESTS => {
                let server_requests = value
                    .get("payload")
                    .and_then(|payload| payload.get("serverRequests"))
                    .cloned()
                    .ok_or_else(|| D::Error::custom("requests frame missing serverRequests"))?;
                Self::Requests {
                    response_to,
                    server_requests: serde_json::from_value(server_requests)
                        .map_err(D::Error::custom)?,
                }
            }
            SERVER_ERROR => Self::Error {
                response_to,
                message: value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown_error")
                    .to_string(),
            },
            SERVER_PONG => Self::Pong {
                response_to: response_to
                    .ok_or_else(|| D::Error::custom("pong frame missing responseTo"))?,
            },
            SERVER_UPDATES => {
                let payload = value
                    .get("payload")
                    .cloned()
                    .ok_or_else(|| D::Error::custom("updates frame missing payload"))?;
                Self::Updates {
                    payload: serde_json::from_value(payload).map_err(D::Error::custom)?,
                }
            }
            other => return Err(D::Error::custom(format!("unknown server frame type {other}"))),
        })
    }
}
