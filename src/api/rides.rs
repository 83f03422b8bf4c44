use serde_json::json;

use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::ride::{Ride, RideRequest, RideStatus};
use crate::models::{ApiRequest, Page};

/// Ride booking and management, for riders, drivers and admins.
pub struct RidesApi<'a> {
    client: &'a JournyClient,
}

impl<'a> RidesApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        RidesApi { client }
    }

    // -- Rider

    pub async fn request_ride(&self, ride: &RideRequest) -> Result<Ride, ClientError> {
        let request = ApiRequest::post("/rides/request").json(serde_json::to_value(ride)?);
        self.client.data(request).await
    }

    pub async fn my_rides(&self) -> Result<Page<Ride>, ClientError> {
        self.client.page(ApiRequest::get("/rides/me")).await
    }

    pub async fn ride(&self, id: &str) -> Result<Ride, ClientError> {
        self.client.data(ApiRequest::get(format!("/rides/{}", id))).await
    }

    pub async fn cancel_ride(&self, id: &str) -> Result<Ride, ClientError> {
        self.client
            .data(ApiRequest::patch(format!("/rides/{}/cancel", id)))
            .await
    }

    /// Pick one of the drivers who showed interest in the ride.
    pub async fn accept_driver(&self, ride_id: &str, driver_id: &str) -> Result<Ride, ClientError> {
        self.client
            .data(ApiRequest::patch(format!(
                "/rides/{}/accept-driver/{}",
                ride_id, driver_id
            )))
            .await
    }

    // -- Driver

    /// Requested rides that are still looking for a driver.
    pub async fn available_rides(&self) -> Result<Page<Ride>, ClientError> {
        self.client.page(ApiRequest::get("/rides/available")).await
    }

    pub async fn show_interest(&self, id: &str) -> Result<Ride, ClientError> {
        self.client
            .data(ApiRequest::patch(format!("/rides/{}/interested", id)))
            .await
    }

    pub async fn update_status(&self, id: &str, status: RideStatus) -> Result<Ride, ClientError> {
        let request =
            ApiRequest::patch(format!("/rides/{}/status", id)).json(json!({ "status": status }));
        self.client.data(request).await
    }

    // -- Admin

    pub async fn all_rides(&self) -> Result<Page<Ride>, ClientError> {
        self.client.page(ApiRequest::get("/rides")).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::client_for;
    use crate::auth::SessionTokens;
    use crate::error::ClientError;
    use crate::models::ride::{Location, RideRequest, RideStatus};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const RIDE: &str = r#"{
        "_id": "ride1",
        "rider": "u1",
        "driver": null,
        "status": "REQUESTED",
        "pickupLocation": { "address": "Station", "lat": 23.81, "lng": 90.41 },
        "destinationLocation": { "address": "Airport", "lat": 23.85, "lng": 90.40 },
        "fare": 420.5,
        "interestedDrivers": ["d1", "d2"],
        "createdAt": "2025-08-01T10:00:00Z"
    }"#;

    fn signed_in(client: &crate::client::JournyClient) {
        client.session().set(SessionTokens {
            access_token: "a1".into(),
            refresh_token: Some("r1".into()),
        });
    }

    #[tokio::test]
    async fn test_request_ride_sends_locations() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/rides/request")
            .match_header("authorization", "Bearer a1")
            .match_body(Matcher::PartialJson(json!({
                "pickupLocation": { "lat": 23.81, "lng": 90.41 },
                "destinationLocation": { "lat": 23.85, "lng": 90.40 }
            })))
            .with_status(201)
            .with_body(format!(
                r#"{{"success":true,"statusCode":201,"message":"Ride requested","data":{}}}"#,
                RIDE
            ))
            .create_async()
            .await;

        let client = client_for(server.url());
        signed_in(&client);
        let ride = client
            .rides()
            .request_ride(&RideRequest {
                pickup_location: Location {
                    address: Some("Station".into()),
                    lat: 23.81,
                    lng: 90.41,
                },
                destination_location: Location {
                    address: Some("Airport".into()),
                    lat: 23.85,
                    lng: 90.40,
                },
            })
            .await
            .expect("ride request should succeed");

        m.assert_async().await;
        assert_eq!(ride.status, RideStatus::Requested);
        assert_eq!(ride.interested_drivers, vec!["d1", "d2"]);
        assert!(!ride.status.is_final());
    }

    #[tokio::test]
    async fn test_available_rides_reads_pagination() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rides/available")
            .with_status(200)
            .with_body(format!(
                r#"{{"success":true,"data":[{}],"meta":{{"page":1,"limit":10,"total":1,"totalPage":1}}}}"#,
                RIDE
            ))
            .create_async()
            .await;

        let client = client_for(server.url());
        signed_in(&client);
        let page = client
            .rides()
            .available_rides()
            .await
            .expect("listing should succeed");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total, Some(1));
        assert_eq!(page.meta.total_page, Some(1));
    }

    #[tokio::test]
    async fn test_update_status_sends_screaming_case() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PATCH", "/rides/ride1/status")
            .match_body(Matcher::Json(json!({ "status": "PICKED_UP" })))
            .with_status(200)
            .with_body(format!(
                r#"{{"success":true,"data":{}}}"#,
                RIDE.replace("REQUESTED", "PICKED_UP")
            ))
            .create_async()
            .await;

        let client = client_for(server.url());
        signed_in(&client);
        let ride = client
            .rides()
            .update_status("ride1", RideStatus::PickedUp)
            .await
            .expect("status update should succeed");

        m.assert_async().await;
        assert_eq!(ride.status, RideStatus::PickedUp);
    }

    #[tokio::test]
    async fn test_api_errors_keep_status_and_message() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/rides/ride1/cancel")
            .with_status(400)
            .with_body(r#"{"success":false,"message":"Ride cannot be cancelled now"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        signed_in(&client);
        let err = client.rides().cancel_ride("ride1").await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Api {
                status: 400,
                message: "Ride cannot be cancelled now".to_string()
            }
        );
    }
}
