//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_session_file() -> String {
    ".ipsearch/session.json".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the search client and its session store.
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bearer token forwarded verbatim on every request.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// JSON file holding the persisted search state between runs.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            session_file: default_session_file(),
        }
    }
}
