//! Client error model.
//!
//! Every variant is cheap to clone: a single refresh failure is handed to each
//! request that was waiting on it.

use http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no refresh credential held in the session")]
    MissingRefreshCredential,

    #[error("session refresh was abandoned before it settled")]
    RefreshAborted,

    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, after_ms: u64) -> Self {
        ClientError::Timeout {
            operation: operation.into(),
            after_ms,
        }
    }

    /// Builds the error for a non-success status, routing 401 to `Unauthorized`.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ClientError::Unauthorized {
                status: status.as_u16(),
                message: message.into(),
            }
        } else {
            ClientError::Api {
                status: status.as_u16(),
                message: message.into(),
            }
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { status, .. } | ClientError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string())
    }
}
