use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use super::coordinator::AuthRefreshCoordinator;
use super::transport::{ReqwestTransport, Transport};
use crate::api::{AnalyticsApi, AuthApi, DriversApi, ReviewsApi, RidesApi, UsersApi};
use crate::auth::{ClientEnvironment, Environment, HttpRefreshBackend, RefreshBackend, SessionStore};
use crate::config::{AuthConfig, ConfigV1};
use crate::error::ClientError;
use crate::metrics::Metrics;
use crate::models::{ApiRequest, ApiResponse, Envelope, Page};

/// Entry point to the Go Journy API.
///
/// Owns the one refresh coordinator for this client; every call made through
/// it, or through any of the endpoint groups, shares that coordinator.
#[derive(Clone)]
pub struct JournyClient {
    coordinator: Arc<AuthRefreshCoordinator>,
    session: Arc<SessionStore>,
    environment: Arc<dyn Environment>,
}

impl JournyClient {
    /// Builds a client talking HTTP to `config.api.base_url`.
    pub fn new(config: &ConfigV1) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::new());
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
            &config.api.base_url,
            config.api.timeout_in_ms,
            session.clone(),
        )?);
        let backend = Arc::new(HttpRefreshBackend::new(
            transport.clone(),
            session.clone(),
            config.auth.refresh_endpoint.as_str(),
        ));
        let environment = Arc::new(ClientEnvironment::new(session.clone()));

        info!("Created Go Journy client for '{}'", config.api.base_url);
        Ok(Self::from_parts(
            transport,
            backend,
            environment,
            session,
            Metrics::new(),
            &config.auth,
        ))
    }

    /// Assembles a client from explicit collaborators.
    pub fn from_parts(
        transport: Arc<dyn Transport>,
        backend: Arc<dyn RefreshBackend>,
        environment: Arc<dyn Environment>,
        session: Arc<SessionStore>,
        metrics: Metrics,
        auth_config: &AuthConfig,
    ) -> Self {
        let coordinator = Arc::new(AuthRefreshCoordinator::new(
            transport,
            backend,
            environment.clone(),
            metrics,
            auth_config,
        ));
        JournyClient {
            coordinator,
            session,
            environment,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.environment
    }

    pub fn coordinator(&self) -> &Arc<AuthRefreshCoordinator> {
        &self.coordinator
    }

    pub fn metrics(&self) -> &Metrics {
        self.coordinator.metrics()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn rides(&self) -> RidesApi<'_> {
        RidesApi::new(self)
    }

    pub fn drivers(&self) -> DriversApi<'_> {
        DriversApi::new(self)
    }

    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    /// Raw request: the response comes back whatever its status, except for an
    /// unrecoverable 401.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.coordinator.execute(request).await
    }

    /// Sends `request` and decodes the envelope of a successful response.
    pub async fn envelope<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Envelope<T>, ClientError> {
        let response = self.execute(request).await?;
        if !response.status.is_success() {
            return Err(response.to_error());
        }
        response.json()
    }

    /// Sends `request` and returns the envelope's `data`.
    pub async fn data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let path = request.path.clone();
        self.envelope::<T>(request)
            .await?
            .data
            .ok_or_else(|| ClientError::decode(format!("response from '{}' carried no data", path)))
    }

    /// Sends `request` and returns the listed items with their pagination block.
    pub async fn page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Page<T>, ClientError> {
        let envelope = self.envelope::<Vec<T>>(request).await?;
        Ok(Page {
            items: envelope.data.unwrap_or_default(),
            meta: envelope.meta.unwrap_or_default(),
        })
    }

    /// Sends `request` and only checks that it succeeded.
    pub async fn expect_success(&self, request: ApiRequest) -> Result<(), ClientError> {
        let response = self.execute(request).await?;
        if !response.status.is_success() {
            return Err(response.to_error());
        }
        Ok(())
    }
}
