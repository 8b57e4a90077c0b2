//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base, matching the development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the LAMPY REST API, including the version prefix.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// Directory for device-local persistent state (session store).
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Build a config from `LAMPY_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("LAMPY_API_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout = std::env::var("LAMPY_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let data_dir = std::env::var("LAMPY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            base_url,
            request_timeout,
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".lampy")
}
