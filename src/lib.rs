//! Library exports for the Go Journy client, shared between the binary and tests.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod startup;
pub mod utils;

pub use client::{AuthRefreshCoordinator, JournyClient};
pub use error::ClientError;
