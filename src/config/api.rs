use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the Go Journy REST API lives and how long a single call may take.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    /// e.g. "http://localhost:5000/api/v1"
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub timeout_in_ms: u64,
}

/// Session refresh behaviour.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AuthConfig {
    /// Route the client is sent to when the session can no longer be refreshed.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// API path of the token refresh endpoint, relative to `api.base_url`.
    #[serde(default = "default_refresh_endpoint")]
    pub refresh_endpoint: String,
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_in_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            login_path: default_login_path(),
            refresh_endpoint: default_refresh_endpoint(),
            refresh_timeout_in_ms: default_refresh_timeout(),
        }
    }
}

/// Credentials used by the binary to open a session on startup.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_refresh_endpoint() -> String {
    "/auth/refresh-token".to_string()
}

fn default_refresh_timeout() -> u64 {
    5_000
}
