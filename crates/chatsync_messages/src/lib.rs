//! # Chatsync Messages
//!
//! Per-type message behavior for the chatsync client core.
//!
//! Every [`MessageType`](chatsync_protocol::MessageType) has exactly one
//! [`MessageSpec`] implementation, reachable through [`message_spec`].
//! A spec answers everything the rest of the client needs to know about
//! a message of its type: its serialized content column, how a stored
//! row becomes a raw message, how a raw message resolves for display,
//! its robotext and notification rendering, and how it degrades on
//! clients below its minimum supported code version.
//!
//! The registry match is exhaustive over `MessageType`, so a new
//! message type cannot be added without deciding all of these
//! behaviors.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod info;
mod registry;
mod row;
mod spec;
mod specs;
mod utils;

pub use info::{MessageInfo, NotifTexts, RobotextMessageInfo};
pub use registry::{message_spec, unshim_message_info};
pub use row::MessageRow;
pub use spec::{MessageContext, MessageSpec, NotifTextsParams, SpecError};
pub use specs::multimedia::pre_dimension_uploads;
pub use utils::{
    encoded_thread_entity, join_result, notif_thread_name, robotext_for_user, stripped_robotext,
};
