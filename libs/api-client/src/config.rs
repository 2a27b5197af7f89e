use serde::{Deserialize, Serialize};

/// Configuration for the remote API transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiClientConfig {
    /// Base URL of the remote API, e.g. `http://localhost:3000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout enforced by the HTTP client.
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_sec: default_timeout_sec(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_sec() -> u64 {
    30
}
