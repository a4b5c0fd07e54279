use crate::models::{ApiRegistration, RegistrationOutcome};

/// Public API trait for the registration relay (Version 1).
///
/// ```ignore
/// let outcome = registrar.register(ApiRegistration::new(url, "orders", "/orders", "team-a")).await;
/// println!("{}", outcome.message());
/// ```
#[async_trait::async_trait]
pub trait ApiRegistrarV1: Send + Sync {
    /// Run the full delete, create, key-auth, acl sequence for `registration`.
    ///
    /// The name is namespaced by the implementation. Step failures never
    /// abort the sequence; they are reported in the returned outcome.
    async fn register(&self, registration: ApiRegistration) -> RegistrationOutcome;

    /// Decommission stale entries. Currently a no-op.
    async fn decommission(&self);
}
