use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::error::ClientError;
use crate::models::{ApiRequest, ApiResponse};

/// Sends one request and returns whatever status came back.
///
/// Implementations never interpret the status: a 401 or a 500 is still an
/// `Ok(ApiResponse)`. Only failures to get a response at all are errors.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// `reqwest`-backed transport against the Go Journy API.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    timeout_in_ms: u64,
    session: Arc<SessionStore>,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &str,
        timeout_in_ms: u64,
        session: Arc<SessionStore>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_in_ms))
            .build()
            .map_err(|e| ClientError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_in_ms,
            session,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(&request.path);
        debug!(
            request_id = %request.id,
            method = %request.method,
            retried = request.retried,
            "Sending request to '{}'",
            url
        );

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());
        if request.with_credentials
            && let Some(token) = self.session.access_token()
        {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(request_id = %request.id, "Request to '{}' timed out", url);
                ClientError::timeout(
                    format!("{} {}", request.method, request.path),
                    self.timeout_in_ms,
                )
            } else {
                warn!(request_id = %request.id, "Request to '{}' failed: {}", url, e);
                ClientError::transport(format!("Failed to call '{}': {}", url, e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(format!("Failed to read body from '{}': {}", url, e)))?;

        debug!(request_id = %request.id, status = status.as_u16(), "Response received");
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionTokens;
    use http::StatusCode;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn session_with(token: &str) -> Arc<SessionStore> {
        Arc::new(SessionStore::with_tokens(SessionTokens {
            access_token: token.to_string(),
            refresh_token: None,
        }))
    }

    #[tokio::test]
    async fn test_attaches_bearer_token_and_json_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/v1/rides/request")
            .match_header("authorization", "Bearer t1")
            .match_body(Matcher::Json(json!({ "pickupLocation": "A" })))
            .with_status(201)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let transport =
            ReqwestTransport::new(&format!("{}/api/v1/", server.url()), 2_000, session_with("t1"))
                .expect("transport should build");
        let request = ApiRequest::post("/rides/request").json(json!({ "pickupLocation": "A" }));

        let response = transport.send(&request).await.expect("send should succeed");

        m.assert_async().await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, r#"{"success":true}"#);
    }

    #[tokio::test]
    async fn test_error_statuses_are_not_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me")
            .with_status(401)
            .with_body(r#"{"message":"jwt expired"}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&server.url(), 2_000, session_with("t1"))
            .expect("transport should build");
        let response = transport
            .send(&ApiRequest::get("/users/me"))
            .await
            .expect("a 401 is still a response");

        assert!(response.is_unauthorized());
        assert_eq!(response.message(), "jwt expired");
    }

    #[tokio::test]
    async fn test_without_credentials_sends_no_authorization() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&server.url(), 2_000, session_with("t1"))
            .expect("transport should build");
        transport
            .send(&ApiRequest::post("/auth/login").without_credentials())
            .await
            .expect("send should succeed");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Nothing listens on port 9 locally.
        let transport = ReqwestTransport::new("http://127.0.0.1:9", 500, session_with("t1"))
            .expect("transport should build");
        let err = transport
            .send(&ApiRequest::get("/users/me"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport { .. } | ClientError::Timeout { .. }
        ));
    }
}
