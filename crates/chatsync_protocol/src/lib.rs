//! # Chatsync Protocol
//!
//! Wire types for the chatsync client-server synchronization core.
//!
//! This crate provides:
//! - Socket frame types (client and server directions)
//! - The tagged server-request / client-response unions
//! - The update envelope and its record variants
//! - Message, thread, entry, and activity payload shapes
//! - The structural ID namespace converter
//!
//! Everything on the wire is JSON. Tagged unions carry a numeric `type`
//! field matching the server's constants; unknown tags are rejected at
//! deserialization rather than silently tolerated.
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod activity;
mod convert;
mod entries;
mod messages;
mod requests;
mod socket;
mod tagged;
mod threads;
mod updates;
mod users;

pub use activity::{
    ActivityUpdate, SetThreadUnreadStatusRequest, SetThreadUnreadStatusResponse,
    UpdateActivityRequest, UpdateActivityResponse,
};
pub use convert::{
    convert_activity_updates, convert_calendar_query, convert_client_response, convert_hashes,
    convert_new_thread_request, convert_raw_entry_info, convert_raw_entry_infos,
    convert_raw_message_info, convert_raw_message_infos, convert_raw_thread_info,
    convert_server_request, convert_session_state, convert_thread_id, convert_update_info,
    convert_update_infos, convert_update_thread_request, convert_updates_payload,
    ConversionDirection,
};
pub use entries::{
    CalendarFilter, CalendarQuery, CreateEntryRequest, CreateEntryResponse, DeleteEntryRequest,
    DeleteEntryResponse, HistoryRevisionInfo, RawEntryInfo, RestoreEntryRequest,
    RestoreEntryResponse, SaveEntryRequest, SaveEntryResponse,
};
pub use messages::{
    Dimensions, FetchMessagesRequest, FetchMessagesResponse, InitialThreadState, Media,
    MessageType, NewMessageBrief, RawChangeRoleMessageInfo, RawChangeSettingsMessageInfo,
    RawCreateThreadMessageInfo, RawEntryOpMessageInfo, RawImagesMessageInfo, RawMediaMessageInfo,
    RawMembershipMessageInfo, RawMessageInfo, RawSubThreadMessageInfo, RawTextMessageInfo,
    RawThreadOpMessageInfo, RawUnsupportedMessageInfo, SendMessageResponse, TruncationStatus,
    LOCAL_ID_PREFIX,
};
pub use requests::{
    CheckStateRequest, CheckStateResponse, ClientResponse, InitialActivityUpdatesResponse,
    PlatformDetails, PlatformDetailsResponse, PlatformResponse, ServerRequest, SessionState,
    StateChanges, THREAD_HASH_PREFIX,
};
pub use socket::{
    ClientMessagePayload, ClientSocketMessage, ProtocolError, ServerMessageType,
    ServerSocketMessage,
};
pub use threads::{
    MemberInfo, NewThreadRequest, NewThreadResponse, RawThreadInfo, RoleInfo, ThreadChanges,
    ThreadInfo, UpdateThreadRequest, UpdateThreadResponse,
};
pub use updates::{
    DeleteAccountUpdate, DeleteThreadUpdate, JoinThreadUpdate, ThreadReadStatusUpdate,
    UpdateCurrentUserUpdate, UpdateEntryUpdate, UpdateInfo, UpdateThreadUpdate, UpdateUserUpdate,
    UpdatesPayload, UpdatesResult,
};
pub use users::{CurrentUserInfo, RelativeUserInfo, UserInfo};
