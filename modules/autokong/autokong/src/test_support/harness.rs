//! Top-level test harness that wires the relay against a mock Kong admin.

use std::sync::Arc;

use autokong_sdk::ApiRegistrarV1;

use crate::config::RelayConfig;
use crate::module::RegistrationRelay;

use super::mock::MockKongAdmin;
use super::relay_api::RelayApi;

/// Fully-wired test environment for relay integration tests.
pub struct AppHarness {
    kong: MockKongAdmin,
    registrar: Arc<dyn ApiRegistrarV1>,
    router: axum::Router,
}

impl AppHarness {
    pub fn builder() -> AppHarnessBuilder {
        AppHarnessBuilder::default()
    }

    pub fn relay_api(&self) -> RelayApi<'_> {
        RelayApi::new(self)
    }

    /// The mock admin API. Receives every call unless the harness was built
    /// with another Kong URL.
    pub fn kong(&self) -> &MockKongAdmin {
        &self.kong
    }

    pub fn registrar(&self) -> &dyn ApiRegistrarV1 {
        &*self.registrar
    }

    pub(crate) fn router(&self) -> &axum::Router {
        &self.router
    }
}

/// Builder for [`AppHarness`].
#[derive(Default)]
pub struct AppHarnessBuilder {
    kong_url: Option<String>,
    credentials: Option<(String, String)>,
}

impl AppHarnessBuilder {
    /// Point the relay somewhere other than the mock (e.g. an unreachable port).
    pub fn with_kong_url(mut self, kong_url: impl Into<String>) -> Self {
        self.kong_url = Some(kong_url.into());
        self
    }

    /// Put `user:password@` into the mock's base URL.
    pub fn with_kong_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    pub async fn build(self) -> AppHarness {
        let kong = MockKongAdmin::start().await;
        let kong_url = match (self.kong_url, self.credentials) {
            (Some(url), _) => url,
            (None, Some((user, password))) => {
                format!("http://{user}:{password}@{}", kong.addr())
            }
            (None, None) => kong.base_url(),
        };

        let config = RelayConfig::new(&kong_url).expect("test kong url");
        let relay = RegistrationRelay::new(&config).expect("test relay");

        AppHarness {
            kong,
            registrar: relay.registrar(),
            router: relay.router(),
        }
    }
}
