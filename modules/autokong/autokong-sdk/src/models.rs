use std::fmt;

use crate::error::RegistrarError;

/// Namespace tag prepended to every entry name the relay manages.
pub const NAME_PREFIX: &str = "autokong";

// ---------------------------------------------------------------------------
// ApiRegistration
// ---------------------------------------------------------------------------

/// Description of one logical API to expose through the gateway.
///
/// Lives only for the duration of a single registration request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRegistration {
    /// Upstream origin the gateway proxies to.
    pub url: String,
    /// Logical name. Becomes `autokong-<name>` once namespaced.
    pub name: String,
    /// Public path prefix, stripped by the gateway before proxying.
    pub path: String,
    /// Access-group whitelist handed verbatim to the ACL plugin.
    pub groups: String,
}

impl ApiRegistration {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        groups: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            path: path.into(),
            groups: groups.into(),
        }
    }

    /// Rewrite `name` into the relay's namespace.
    ///
    /// An empty name still gets the prefix, so a zero-valued registration
    /// targets the entry `autokong-`.
    #[must_use]
    pub fn into_namespaced(mut self) -> Self {
        self.name = namespaced_name(&self.name);
        self
    }
}

/// `autokong-<name>`.
#[must_use]
pub fn namespaced_name(name: &str) -> String {
    format!("{NAME_PREFIX}-{name}")
}

// ---------------------------------------------------------------------------
// RegistrationStep
// ---------------------------------------------------------------------------

/// One admin call in the registration sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    Delete,
    Create,
    KeyAuth,
    Acl,
}

impl RegistrationStep {
    /// Execution order. Every step runs, whatever happened before it.
    pub const ALL: [Self; 4] = [Self::Delete, Self::Create, Self::KeyAuth, Self::Acl];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Create => "create",
            Self::KeyAuth => "key-auth",
            Self::Acl => "acl",
        }
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RegistrationOutcome
// ---------------------------------------------------------------------------

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: RegistrationStep,
    pub result: Result<(), RegistrarError>,
}

/// Everything that happened while registering one API.
///
/// Only the final step decides whether the registration is reported as a
/// success; earlier failures are kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    name: String,
    steps: Vec<StepResult>,
}

impl RegistrationOutcome {
    #[must_use]
    pub fn new(name: impl Into<String>, steps: Vec<StepResult>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Namespaced entry name every call targeted.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// Error of the last step, if it failed.
    #[must_use]
    pub fn final_error(&self) -> Option<&RegistrarError> {
        self.steps.last().and_then(|s| s.result.as_ref().err())
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.steps.is_empty() && self.final_error().is_none()
    }

    /// Steps that failed, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = (RegistrationStep, &RegistrarError)> {
        self.steps
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.step, e)))
    }

    /// Plain-text message returned to the caller.
    #[must_use]
    pub fn message(&self) -> String {
        match self.final_error() {
            Some(err) => format!("Failed to register the API with error {err}"),
            None => format!("Registered API {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(step: RegistrationStep) -> StepResult {
        StepResult {
            step,
            result: Ok(()),
        }
    }

    fn failed(step: RegistrationStep, detail: &str) -> StepResult {
        StepResult {
            step,
            result: Err(RegistrarError::Transport {
                detail: detail.into(),
            }),
        }
    }

    #[test]
    fn namespacing_prefixes_name() {
        let reg = ApiRegistration::new("http://svc:9000", "orders", "/orders", "team-a");
        assert_eq!(reg.into_namespaced().name, "autokong-orders");
    }

    #[test]
    fn namespacing_empty_name_keeps_dash() {
        let reg = ApiRegistration::default().into_namespaced();
        assert_eq!(reg.name, "autokong-");
        assert!(reg.url.is_empty());
    }

    #[test]
    fn steps_run_in_fixed_order() {
        let labels: Vec<&str> = RegistrationStep::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(labels, ["delete", "create", "key-auth", "acl"]);
    }

    #[test]
    fn success_message_uses_namespaced_name() {
        let outcome = RegistrationOutcome::new(
            "autokong-orders",
            RegistrationStep::ALL.into_iter().map(ok).collect(),
        );
        assert!(outcome.is_registered());
        assert_eq!(outcome.message(), "Registered API autokong-orders");
    }

    #[test]
    fn only_final_step_decides_message() {
        let outcome = RegistrationOutcome::new(
            "autokong-orders",
            vec![
                failed(RegistrationStep::Delete, "boom"),
                failed(RegistrationStep::Create, "boom"),
                ok(RegistrationStep::KeyAuth),
                ok(RegistrationStep::Acl),
            ],
        );
        assert!(outcome.is_registered());
        assert_eq!(outcome.failures().count(), 2);
    }

    #[test]
    fn failed_final_step_reports_its_error() {
        let outcome = RegistrationOutcome::new(
            "autokong-orders",
            vec![
                ok(RegistrationStep::Delete),
                ok(RegistrationStep::Create),
                ok(RegistrationStep::KeyAuth),
                failed(RegistrationStep::Acl, "connection refused"),
            ],
        );
        assert!(!outcome.is_registered());
        assert_eq!(
            outcome.message(),
            "Failed to register the API with error connection refused"
        );
    }

    #[test]
    fn empty_outcome_is_not_registered() {
        let outcome = RegistrationOutcome::new("autokong-x", Vec::new());
        assert!(!outcome.is_registered());
    }
}
