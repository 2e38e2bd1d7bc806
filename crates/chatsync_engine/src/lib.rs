//! The client-side synchronization engine.
//!
//! This crate owns everything between the raw duplex socket and the
//! consumer's state store: request/response correlation over the
//! socket ([`inflight`]), the socket session itself ([`socket`]),
//! handlers for server-pushed updates and state-check requests
//! ([`update_handler`], [`request_handler`]), and the typed action
//! layer over the server's JSON commands ([`actions`]).
//!
//! I/O is abstracted behind two seams, [`SocketTransport`] and
//! [`ApiClient`], so the whole engine runs against in-memory mocks in
//! tests. State application is likewise abstracted behind
//! [`IntentDispatcher`]: the engine never mutates application state
//! directly, it emits [`StateIntent`]s for the consumer to apply.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
mod config;
mod dispatch;
mod error;
mod inflight;
mod request_handler;
mod socket;
mod transport;
mod update_handler;

pub use config::SyncConfig;
pub use dispatch::{IntentDispatcher, MemoryUpdateStore, RecordingDispatcher, StateIntent};
pub use error::{SyncError, SyncResult};
pub use inflight::{fetch_response, InflightRequests, ResponseWaiter};
pub use request_handler::{handle_server_requests, ResponseSource};
pub use socket::SyncSocket;
pub use transport::{
    ApiClient, ConnectionStatus, MockApiClient, MockTransport, SocketTransport,
};
pub use update_handler::handle_updates_payload;
