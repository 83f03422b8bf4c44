use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ClientError;

/// A request as it travels through the client.
///
/// It keeps everything needed to send it again: the coordinator replays a
/// request at most once, after a successful session refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub id: Uuid,
    pub method: Method,
    /// Path relative to the configured API base url, e.g. "/rides/me".
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    /// Attach the session's access token when sending.
    pub with_credentials: bool,
    /// Set once the request has been through a refresh cycle.
    pub retried: bool,
    /// Whether a 401 on this request may trigger a session refresh.
    pub refreshable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
            with_credentials: true,
            retried: false,
            refreshable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Opt out of the refresh cycle: a 401 is returned to the caller as is.
    /// Used for login, where a 401 means bad credentials rather than an expired session.
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.with_credentials = false;
        self
    }
}

/// A response as returned by the transport, before any envelope decoding.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ClientError::decode(format!("{} (status {})", e, self.status)))
    }

    /// Server-provided message, falling back to the status reason.
    pub fn message(&self) -> String {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                self.status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            })
    }

    /// Converts a non-success response into the matching error.
    pub fn to_error(&self) -> ClientError {
        ClientError::from_status(self.status, self.message())
    }
}
