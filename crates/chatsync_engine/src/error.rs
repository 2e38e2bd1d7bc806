//! The engine's error taxonomy.

use chatsync_protocol::ProtocolError;
use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type SyncResult<T> = Result<T, SyncError>;

/// Everything that can go wrong between the engine and the server.
///
/// Programming errors (a raw message handed to the wrong spec, an
/// unregistered tag) are not represented here; they panic.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The transport could not carry the frame or request.
    #[error("transport failure: {message}")]
    Transport {
        /// Human-readable cause.
        message: String,
        /// Whether the transport itself considers a retry worthwhile.
        retryable: bool,
    },

    /// No response arrived within the configured window.
    #[error("timed out waiting for a socket response")]
    Timeout,

    /// The connection was torn down while the request was in flight.
    #[error("connection reset (generation {generation})")]
    ConnectionReset {
        /// The generation the connection moved to.
        generation: u64,
    },

    /// The server reported an error; the message is propagated
    /// verbatim.
    #[error("server error: {0}")]
    Server(String),

    /// The peer violated the wire protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The operation needs a live socket and there is none.
    #[error("socket is not connected")]
    NotConnected,
}

impl SyncError {
    /// Whether this failure leaves response delivery ambiguous.
    ///
    /// The request handler retries a failed `Responses` frame exactly
    /// once, and only for ambiguous failures: a timeout means the
    /// frame may well have arrived, and a server error other than
    /// `unknown_error` means it definitely did. Both are excluded;
    /// everything else qualifies. The caller separately requires the
    /// connection to still be up.
    pub fn ambiguous_for_response_retry(&self) -> bool {
        match self {
            SyncError::Timeout => false,
            SyncError::Server(message) => message == "unknown_error",
            _ => true,
        }
    }

    /// Shorthand for a non-retryable transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport {
            message: message.into(),
            retryable: false,
        }
    }
}

impl From<ProtocolError> for SyncError {
    fn from(error: ProtocolError) -> Self {
        SyncError::Protocol(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_eligibility() {
        assert!(!SyncError::Timeout.ambiguous_for_response_retry());
        assert!(!SyncError::Server("invalid_parameters".into()).ambiguous_for_response_retry());
        assert!(SyncError::Server("unknown_error".into()).ambiguous_for_response_retry());
        assert!(SyncError::transport("socket closed").ambiguous_for_response_retry());
        assert!(SyncError::ConnectionReset { generation: 2 }.ambiguous_for_response_retry());
    }
}
