//! Calendar entry payload shapes and the entry-facing wire calls.

use crate::messages::RawMessageInfo;
use crate::updates::UpdatesResult;
use serde::{Deserialize, Serialize};

/// The window and thread filter a client is watching on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    /// Inclusive window start, `YYYY-MM-DD`.
    pub start_date: String,
    /// Inclusive window end, `YYYY-MM-DD`.
    pub end_date: String,
    /// Filters narrowing which entries are delivered.
    #[serde(default)]
    pub filters: Vec<CalendarFilter>,
}

/// A single calendar filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarFilter {
    /// Exclude deleted entries.
    NotDeleted,
    /// Restrict to the given threads.
    Threads {
        /// The watched threads.
        #[serde(rename = "threadIDs")]
        thread_ids: Vec<String>,
    },
}

/// The server-shaped representation of one calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntryInfo {
    /// Server-assigned entry ID; absent until confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client-generated temporary ID; present for client-originated
    /// entries not yet confirmed.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Entry text.
    pub text: String,
    /// Entry year.
    pub year: i32,
    /// Entry month, 1-based.
    pub month: u32,
    /// Entry day of month.
    pub day: u32,
    /// Creation timestamp, milliseconds since the epoch.
    pub creation_time: u64,
    /// Entry author.
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    /// Whether the entry is currently deleted.
    pub deleted: bool,
}

/// One revision in an entry's edit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRevisionInfo {
    /// Revision ID.
    pub id: String,
    /// The revised entry.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// Revision author.
    #[serde(rename = "authorID")]
    pub author_id: String,
    /// Entry text after this revision.
    pub text: String,
    /// Revision timestamp, milliseconds since the epoch.
    pub last_update: u64,
    /// Whether this revision deleted the entry.
    pub deleted: bool,
}

/// Request body for the `create_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    /// Entry text.
    pub text: String,
    /// Entry date, `YYYY-MM-DD`.
    pub date: String,
    /// Containing thread.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// Client-generated temporary ID for reconciliation.
    #[serde(rename = "localID", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    /// Client timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// The client's current calendar window.
    pub calendar_query: CalendarQuery,
}

/// Response body for the `create_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryResponse {
    /// The server-assigned entry ID.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// System messages the creation produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
    /// State updates the creation produced.
    pub updates_result: UpdatesResult,
}

/// Request body for the `save_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryRequest {
    /// Entry to edit.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// New entry text.
    pub text: String,
    /// Text the client last saw, for concurrent-edit detection.
    pub prev_text: String,
    /// Client timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// The client's current calendar window.
    pub calendar_query: CalendarQuery,
}

/// Response body for the `save_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryResponse {
    /// The edited entry.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// System messages the edit produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
    /// State updates the edit produced.
    pub updates_result: UpdatesResult,
}

/// Request body for the `delete_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryRequest {
    /// Entry to delete.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// Text the client last saw, for concurrent-edit detection.
    pub prev_text: String,
    /// Client timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// The client's current calendar window.
    pub calendar_query: CalendarQuery,
}

/// Response body for the `delete_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryResponse {
    /// The thread the entry belonged to.
    #[serde(rename = "threadID")]
    pub thread_id: String,
    /// System messages the deletion produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
    /// State updates the deletion produced.
    pub updates_result: UpdatesResult,
}

/// Request body for the `restore_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreEntryRequest {
    /// Entry to restore.
    #[serde(rename = "entryID")]
    pub entry_id: String,
    /// Client timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// The client's current calendar window.
    pub calendar_query: CalendarQuery,
}

/// Response body for the `restore_entry` wire call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreEntryResponse {
    /// System messages the restore produced.
    #[serde(default)]
    pub new_message_infos: Vec<RawMessageInfo>,
    /// State updates the restore produced.
    pub updates_result: UpdatesResult,
}
