//! Engine configuration.

use chatsync_protocol::PlatformDetails;
use std::time::Duration;

/// Tunables for the synchronization engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base HTTP URL of the server, e.g. `https://chat.example.com`.
    pub base_url: String,
    /// What this client reports about itself.
    pub platform_details: PlatformDetails,
    /// How long to wait for a correlated socket response.
    pub response_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            platform_details: PlatformDetails {
                platform: "native".to_string(),
                code_version: None,
                state_version: None,
            },
            response_timeout: Duration::from_secs(10),
        }
    }
}

impl SyncConfig {
    /// Sets the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the reported platform details.
    pub fn with_platform_details(mut self, platform_details: PlatformDetails) -> Self {
        self.platform_details = platform_details;
        self
    }

    /// Sets the correlated-response timeout.
    pub fn with_response_timeout(mut self, response_timeout: Duration) -> Self {
        self.response_timeout = response_timeout;
        self
    }

    /// Derives the socket endpoint from the base URL: the scheme moves
    /// to its WebSocket counterpart and `/ws` is appended.
    pub fn socket_endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let derived = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{derived}/ws")
    }
}
