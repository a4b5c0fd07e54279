use std::sync::Arc;

use autokong_sdk::{
    ApiRegistrarV1, ApiRegistration, RegistrationOutcome, RegistrationStep, StepResult,
};
use tracing::{info, warn};

use super::KongAdmin;
use crate::domain::error::DomainError;

/// Runs the delete, create, key-auth, acl sequence against a [`KongAdmin`].
///
/// Failures are logged and recorded but never stop the sequence. Requests for
/// the same name are not serialized against each other.
pub(crate) struct RegistrationServiceImpl {
    admin: Arc<dyn KongAdmin>,
}

impl RegistrationServiceImpl {
    #[must_use]
    pub(crate) fn new(admin: Arc<dyn KongAdmin>) -> Self {
        Self { admin }
    }

    async fn run_step(
        &self,
        step: RegistrationStep,
        registration: &ApiRegistration,
    ) -> Result<(), DomainError> {
        match step {
            RegistrationStep::Delete => self.admin.delete_api(&registration.name).await,
            RegistrationStep::Create => self.admin.create_api(registration).await,
            RegistrationStep::KeyAuth => self.admin.add_key_auth(&registration.name).await,
            RegistrationStep::Acl => {
                self.admin
                    .add_acl(&registration.name, &registration.groups)
                    .await
            }
        }
    }
}

#[async_trait::async_trait]
impl ApiRegistrarV1 for RegistrationServiceImpl {
    async fn register(&self, registration: ApiRegistration) -> RegistrationOutcome {
        let registration = registration.into_namespaced();
        info!(
            name = %registration.name,
            url = %registration.url,
            path = %registration.path,
            groups = %registration.groups,
            "Registering API"
        );

        let mut steps = Vec::with_capacity(RegistrationStep::ALL.len());
        for step in RegistrationStep::ALL {
            let result = self.run_step(step, &registration).await;
            if let Err(ref e) = result {
                warn!(
                    name = %registration.name,
                    step = step.as_str(),
                    error = %e,
                    "Gateway call failed"
                );
            }
            steps.push(StepResult {
                step,
                result: result.map_err(Into::into),
            });
        }

        let outcome = RegistrationOutcome::new(registration.name, steps);
        if outcome.is_registered() {
            info!(name = %outcome.name(), "API added");
        } else {
            warn!(
                name = %outcome.name(),
                failed_steps = outcome.failures().count(),
                "API registration failed"
            );
        }
        outcome
    }

    async fn decommission(&self) {
        info!("This doesn't do anything, for now");
    }
}
