use serde::{Deserialize, Serialize};

/// Where the assistant backend lives and how long we wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub base_url: String,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 5-600). Chat turns run
    /// kubectl commands server-side, so this is generous.
    pub request_timeout_secs: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
