use serde_json::json;

use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::review::Review;
use crate::models::{ApiRequest, Page};

pub struct ReviewsApi<'a> {
    client: &'a JournyClient,
}

impl<'a> ReviewsApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        ReviewsApi { client }
    }

    /// Rate the driver of a completed ride.
    pub async fn create_review(
        &self,
        ride_id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<Review, ClientError> {
        let request = ApiRequest::post("/reviews").json(json!({
            "ride": ride_id,
            "rating": rating,
            "comment": comment,
        }));
        self.client.data(request).await
    }

    pub async fn driver_reviews(&self, driver_id: &str) -> Result<Page<Review>, ClientError> {
        self.client
            .page(ApiRequest::get(format!("/reviews/driver/{}", driver_id)))
            .await
    }
}
