pub mod api;
pub mod error;

pub mod models;

pub use models::{
    ApiRegistration, NAME_PREFIX, RegistrationOutcome, RegistrationStep, StepResult,
    namespaced_name,
};

pub use api::ApiRegistrarV1;
pub use error::RegistrarError;
