//! Typed endpoint groups of the Go Journy API.
//!
//! Each group borrows the client, so every call shares its session and
//! refresh coordinator.

pub mod analytics;
pub mod auth;
pub mod drivers;
pub mod reviews;
pub mod rides;
pub mod users;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use drivers::DriversApi;
pub use reviews::ReviewsApi;
pub use rides::RidesApi;
pub use users::UsersApi;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::client::JournyClient;
    use crate::config::{ApiConfig, AuthConfig, ConfigV1, LoggingConfig};

    /// A client pointed at a mock server, with a short refresh timeout.
    pub fn client_for(url: String) -> JournyClient {
        let config = ConfigV1 {
            api: ApiConfig {
                base_url: url,
                timeout_in_ms: 2_000,
            },
            auth: AuthConfig {
                refresh_timeout_in_ms: 1_000,
                ..AuthConfig::default()
            },
            logging: LoggingConfig::default(),
            account: None,
        };
        JournyClient::new(&config).expect("client should build")
    }
}
