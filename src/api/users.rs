use serde_json::json;

use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::user::{ProfileUpdate, User};
use crate::models::{ApiRequest, Page};

pub struct UsersApi<'a> {
    client: &'a JournyClient,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        UsersApi { client }
    }

    /// The signed-in account.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.client.data(ApiRequest::get("/users/me")).await
    }

    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<User, ClientError> {
        let request = ApiRequest::patch(format!("/users/{}", id)).json(serde_json::to_value(update)?);
        self.client.data(request).await
    }

    // -- Admin

    pub async fn all_users(&self) -> Result<Page<User>, ClientError> {
        self.client.page(ApiRequest::get("/users/all-users")).await
    }

    pub async fn set_blocked(&self, id: &str, blocked: bool) -> Result<User, ClientError> {
        let request = ApiRequest::patch(format!("/users/{}", id)).json(json!({ "isBlocked": blocked }));
        self.client.data(request).await
    }
}
