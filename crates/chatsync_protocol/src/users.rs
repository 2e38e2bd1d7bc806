//! User payload shapes.

use serde::{Deserialize, Serialize};

/// A user as delivered by the server (identifier plus display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Server-assigned user ID.
    pub id: String,
    /// Display name, absent for deleted accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserInfo {
    /// Creates a user info with a username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
        }
    }
}

/// The logged-in user as the server sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserInfo {
    /// Server-assigned user ID.
    pub id: String,
    /// Display name.
    pub username: String,
}

/// A user resolved relative to the viewer, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeUserInfo {
    /// Server-assigned user ID.
    pub id: String,
    /// Display name, absent for deleted accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Whether this user is the viewer themselves.
    pub is_viewer: bool,
}

impl RelativeUserInfo {
    /// Creates a relative user info for someone other than the viewer.
    pub fn other(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
            is_viewer: false,
        }
    }

    /// Creates a relative user info for the viewer.
    pub fn viewer(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
            is_viewer: true,
        }
    }

    /// The name to render for this user.
    ///
    /// The viewer is shown as "you"; deleted accounts as "anonymous".
    pub fn display_name(&self) -> &str {
        if self.is_viewer {
            "you"
        } else {
            self.username.as_deref().unwrap_or("anonymous")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_resolution() {
        assert_eq!(RelativeUserInfo::other("1", "alice").display_name(), "alice");
        assert_eq!(RelativeUserInfo::viewer("2", "bob").display_name(), "you");

        let deleted = RelativeUserInfo {
            id: "3".into(),
            username: None,
            is_viewer: false,
        };
        assert_eq!(deleted.display_name(), "anonymous");
    }

    #[test]
    fn user_info_json_shape() {
        let user = UserInfo::new("85", "alice");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "85", "username": "alice" }));
    }
}
