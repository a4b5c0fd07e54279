// === PUBLIC API (from SDK) ===
pub use autokong_sdk::{
    ApiRegistrarV1, ApiRegistration, RegistrarError, RegistrationOutcome, RegistrationStep,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::RegistrationRelay;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
pub mod config;
pub(crate) mod domain;
pub(crate) mod infra;

pub use config::{ConfigError, KONG_URL_ENV, RelayConfig};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
