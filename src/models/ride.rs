use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a ride, as tracked by the API.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Accepted,
    PickedUp,
    InTransit,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// A ride in one of these states will not change again.
    pub fn is_final(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    #[serde(rename = "_id")]
    pub id: String,
    pub rider: String,
    pub driver: Option<String>,
    pub status: RideStatus,
    pub pickup_location: Location,
    pub destination_location: Location,
    pub fare: Option<f64>,
    #[serde(default)]
    pub interested_drivers: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /rides/request`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    pub pickup_location: Location,
    pub destination_location: Location,
}
