use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub ride: String,
    pub rider: String,
    pub driver: String,
    pub rating: u8,
    pub comment: Option<String>,
}
