use std::sync::Arc;

use autokong_sdk::ApiRegistrarV1;
use tracing::info;

use crate::api::rest::routes;
use crate::config::RelayConfig;
use crate::domain::services::{KongAdmin, RegistrationServiceImpl};
use crate::infra::KongAdminClient;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) registrar: Arc<dyn ApiRegistrarV1>,
}

/// Registration relay: wires the Kong admin client, the registration
/// service, and the REST routes.
pub struct RegistrationRelay {
    state: AppState,
}

impl RegistrationRelay {
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        info!(config = ?config, "Initializing registration relay");

        let admin: Arc<dyn KongAdmin> = Arc::new(KongAdminClient::new(config)?);
        let registrar: Arc<dyn ApiRegistrarV1> = Arc::new(RegistrationServiceImpl::new(admin));

        Ok(Self {
            state: AppState { registrar },
        })
    }

    /// In-process entry point, for callers that skip the HTTP surface.
    #[must_use]
    pub fn registrar(&self) -> Arc<dyn ApiRegistrarV1> {
        Arc::clone(&self.state.registrar)
    }

    /// Router exposing `/add` and `/remove`.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        info!("Registering relay REST routes");
        routes::register_routes(axum::Router::new(), self.state.clone())
    }
}
