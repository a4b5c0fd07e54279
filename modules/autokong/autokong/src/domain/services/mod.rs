pub(crate) mod registration;

pub(crate) use registration::RegistrationServiceImpl;

use crate::domain::error::DomainError;
use crate::domain::model::ApiRegistration;

/// Internal seam over the gateway admin API, one method per registration step.
///
/// Names passed in are already namespaced.
#[async_trait::async_trait]
pub(crate) trait KongAdmin: Send + Sync {
    async fn delete_api(&self, name: &str) -> Result<(), DomainError>;

    async fn create_api(&self, registration: &ApiRegistration) -> Result<(), DomainError>;

    async fn add_key_auth(&self, name: &str) -> Result<(), DomainError>;

    async fn add_acl(&self, name: &str, groups: &str) -> Result<(), DomainError>;
}
