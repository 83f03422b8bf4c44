use serde_json::json;

use crate::client::JournyClient;
use crate::error::ClientError;
use crate::models::driver::{ApprovalStatus, Driver, DriverApplication, Earnings};
use crate::models::{ApiRequest, Page};

pub struct DriversApi<'a> {
    client: &'a JournyClient,
}

impl<'a> DriversApi<'a> {
    pub fn new(client: &'a JournyClient) -> Self {
        DriversApi { client }
    }

    /// Submit a driver application for the signed-in rider.
    pub async fn apply(&self, application: &DriverApplication) -> Result<Driver, ClientError> {
        let request = ApiRequest::post("/drivers/apply").json(serde_json::to_value(application)?);
        self.client.data(request).await
    }

    pub async fn my_profile(&self) -> Result<Driver, ClientError> {
        self.client.data(ApiRequest::get("/drivers/me")).await
    }

    /// Go online or offline. Returns the driver as stored by the server.
    pub async fn set_availability(&self, available: bool) -> Result<Driver, ClientError> {
        let request =
            ApiRequest::patch("/drivers/availability").json(json!({ "isAvailable": available }));
        self.client.data(request).await
    }

    pub async fn earnings(&self) -> Result<Earnings, ClientError> {
        self.client.data(ApiRequest::get("/drivers/earnings")).await
    }

    // -- Admin

    pub async fn all_drivers(&self) -> Result<Page<Driver>, ClientError> {
        self.client.page(ApiRequest::get("/drivers")).await
    }

    pub async fn set_approval(&self, id: &str, status: ApprovalStatus) -> Result<Driver, ClientError> {
        let request = ApiRequest::patch(format!("/drivers/{}/approval", id))
            .json(json!({ "approvalStatus": status }));
        self.client.data(request).await
    }
}
