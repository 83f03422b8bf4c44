use serde::{Deserialize, Serialize};

/// The wrapper every Go Journy endpoint puts around its payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

/// Pagination block returned by list endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub total_page: Option<u32>,
}

/// A list payload together with its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}
