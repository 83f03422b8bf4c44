use std::sync::Arc;

use http::HeaderValue;
use http::header::COOKIE;
use serde::Deserialize;
use tracing::debug;

use super::session::SessionStore;
use crate::client::Transport;
use crate::error::ClientError;
use crate::models::{ApiRequest, Envelope};

/// Something that can renew the session's access credential.
#[async_trait::async_trait]
pub trait RefreshBackend: Send + Sync {
    async fn refresh(&self) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshedTokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Calls the API's refresh endpoint with the refresh token as a cookie and
/// stores the rotated tokens in the session.
pub struct HttpRefreshBackend {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    endpoint: String,
}

impl HttpRefreshBackend {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        endpoint: impl Into<String>,
    ) -> Self {
        HttpRefreshBackend {
            transport,
            session,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl RefreshBackend for HttpRefreshBackend {
    async fn refresh(&self) -> Result<(), ClientError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(ClientError::MissingRefreshCredential)?;
        let cookie = HeaderValue::from_str(&format!("refreshToken={}", refresh_token))
            .map_err(|_| ClientError::decode("refresh token is not a valid header value"))?;

        debug!("Requesting new access token from '{}'", self.endpoint);
        let request = ApiRequest::post(self.endpoint.as_str())
            .without_credentials()
            .without_refresh()
            .header(COOKIE, cookie);

        let response = self.transport.send(&request).await?;
        if !response.status.is_success() {
            return Err(response.to_error());
        }

        let envelope: Envelope<RefreshedTokens> = response.json()?;
        let tokens = envelope
            .data
            .ok_or_else(|| ClientError::decode("refresh response carried no data"))?;
        let access_token = tokens
            .access_token
            .ok_or_else(|| ClientError::decode("refresh response carried no access token"))?;

        self.session.rotate(access_token, tokens.refresh_token);
        debug!("Access token refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionTokens;
    use crate::client::ReqwestTransport;
    use mockito::Server;

    fn backend_for(url: String, session: Arc<SessionStore>) -> HttpRefreshBackend {
        let transport = ReqwestTransport::new(&url, 2_000, session.clone())
            .expect("transport should build");
        HttpRefreshBackend::new(Arc::new(transport), session, "/auth/refresh-token")
    }

    fn stale_session() -> Arc<SessionStore> {
        Arc::new(SessionStore::with_tokens(SessionTokens {
            access_token: "stale".into(),
            refresh_token: Some("r1".into()),
        }))
    }

    #[tokio::test]
    async fn test_refresh_rotates_access_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/refresh-token")
            .match_header("cookie", "refreshToken=r1")
            .with_status(200)
            .with_body(
                r#"{"success":true,"message":"New access token retrieved","data":{"accessToken":"fresh"}}"#,
            )
            .create_async()
            .await;

        let session = stale_session();
        let backend = backend_for(server.url(), session.clone());

        backend.refresh().await.expect("refresh should succeed");

        m.assert_async().await;
        assert_eq!(session.access_token().as_deref(), Some("fresh"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_refresh_does_not_send_bearer_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/refresh-token")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"accessToken":"fresh"}}"#)
            .create_async()
            .await;

        let backend = backend_for(server.url(), stale_session());
        assert!(backend.refresh().await.is_ok());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_rejected_by_server() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/refresh-token")
            .with_status(401)
            .with_body(r#"{"success":false,"message":"Refresh token expired"}"#)
            .create_async()
            .await;

        let session = stale_session();
        let backend = backend_for(server.url(), session.clone());

        let err = backend.refresh().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Refresh token expired"));
        assert_eq!(session.access_token().as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_refresh_without_access_token_in_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/refresh-token")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{}}"#)
            .create_async()
            .await;

        let backend = backend_for(server.url(), stale_session());
        let err = backend.refresh().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_skips_network() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/refresh-token")
            .expect(0)
            .create_async()
            .await;

        let session = Arc::new(SessionStore::new());
        let backend = backend_for(server.url(), session);

        let err = backend.refresh().await.unwrap_err();
        assert_eq!(err, ClientError::MissingRefreshCredential);
        m.assert_async().await;
    }
}
