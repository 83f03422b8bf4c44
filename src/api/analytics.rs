use serde_json::Value;

use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::ApiRequest;

/// Admin dashboard figures.
pub struct AnalyticsApi<'a> {
    client: &'a JournyClient,
}

impl<'a> AnalyticsApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        AnalyticsApi { client }
    }

    /// Platform totals (users, rides, revenue). The shape is owned by the
    /// server and returned as is.
    pub async fn overview(&self) -> Result<Value, ClientError> {
        self.client.data(ApiRequest::get("/analytics/overview")).await
    }
}
