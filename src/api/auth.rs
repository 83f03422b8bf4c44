use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::SessionTokens;
use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::ApiRequest;
use crate::models::user::{Registration, User};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    access_token: String,
    refresh_token: Option<String>,
    user: User,
}

/// Opening and closing sessions.
pub struct AuthApi<'a> {
    client: &'a JournyClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        AuthApi { client }
    }

    /// Signs in and stores the issued tokens in the client's session.
    ///
    /// A 401 here means wrong credentials, so it never triggers a refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/login")
            .without_credentials()
            .without_refresh()
            .json(json!({ "email": email, "password": password }));

        let data: LoginData = self.client.data(request).await?;
        self.client.session().set(SessionTokens {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
        });
        info!("Signed in as '{}' ({:?})", data.user.email, data.user.role);
        Ok(data.user)
    }

    /// Ends the session on the server. Local credentials are dropped even if
    /// the server call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = ApiRequest::post("/auth/logout").without_refresh();
        let result = self.client.expect_success(request).await;
        self.client.session().clear();
        if let Err(e) = &result {
            warn!("Server-side logout failed: {}", e);
        }
        result
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ClientError> {
        let request = ApiRequest::post("/users/register")
            .without_credentials()
            .without_refresh()
            .json(serde_json::to_value(registration)?);
        self.client.data(request).await
    }
}
