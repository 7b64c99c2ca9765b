// Settings module
// Client configuration loaded from the platform config directory

use serde::{Deserialize, Serialize};

/// Client configuration.
///
/// Everything here is ambient configuration for the running client; view
/// state (cursor date, fetched events) is deliberately not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the AURA backend, including the `/api` prefix.
    pub api_base_url: String,
    /// Vertical scale of the timeline. Must be at least 1.
    pub pixels_per_minute: f32,
    /// Bound on every schedule API request.
    pub request_timeout_secs: u64,
    /// Whether desktop notifications are shown for action outcomes.
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            pixels_per_minute: 2.0,
            request_timeout_secs: 20,
            notifications_enabled: true,
        }
    }
}

impl Settings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.trim().is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err("API base URL must be an http(s) URL".to_string());
        }

        if self.pixels_per_minute < 1.0 {
            return Err("pixels_per_minute must be at least 1".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be positive".to_string());
        }

        Ok(())
    }
}
