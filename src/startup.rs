//! Binary startup: build the client and check the configured account.
//!
//! Signs in with `account` from the config (if any) and loads the profile and
//! ride history concurrently, so an expired session at any point goes through
//! the same refresh path the rest of the client uses.

use std::sync::Arc;

use futures::try_join;
use tracing::{debug, info, warn};

use crate::client::JournyClient;
use crate::config::ConfigV1;
use crate::error::ClientError;

/// Builds the client and runs the session check.
///
/// # Errors
///
/// Returns the first client error hit while signing in or loading data.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), ClientError> {
    let client = JournyClient::new(&config)?;

    let Some(account) = &config.account else {
        warn!("No account configured; nothing to check against '{}'", config.api.base_url);
        return Ok(());
    };

    let user = client.auth().login(&account.email, &account.password).await?;
    info!("Session opened for '{}' ({:?})", user.name, user.role);

    let users = client.users();
    let rides = client.rides();
    let (me, history) = try_join!(users.me(), rides.my_rides())?;
    let active = history
        .items
        .iter()
        .filter(|ride| !ride.status.is_final())
        .count();
    info!(
        "'{}' has {} ride(s) on record, {} still active",
        me.email,
        history.meta.total.unwrap_or(history.items.len() as u64),
        active
    );

    debug!("Client metrics:\n{}", client.metrics().render());
    Ok(())
}
