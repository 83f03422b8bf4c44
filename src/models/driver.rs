use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub model: String,
    pub license_plate: String,
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub license_number: String,
    pub vehicle: Vehicle,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub total_earnings: f64,
}

/// Payload for `POST /drivers/apply`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DriverApplication {
    pub license_number: String,
    pub vehicle: Vehicle,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    pub total_earnings: f64,
    #[serde(default)]
    pub completed_rides: u64,
}
