use autokong_sdk::RegistrationStep;
use http::{Method, StatusCode};

pub use autokong_sdk::ApiRegistration;

/// Content type sent with every admin call, body or not.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header Kong's key-auth plugin reads the consumer key from.
pub const API_KEY_HEADER: &str = "X-apikey";

/// One outbound call against the gateway admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCall {
    pub step: RegistrationStep,
    pub method: Method,
    pub url: String,
    /// Already form-url-encoded body.
    pub form: Option<String>,
}

impl AdminCall {
    /// Whether the gateway's answer counts as success for this call.
    ///
    /// Deleting an entry that does not exist is fine.
    #[must_use]
    pub fn accepts(&self, status: StatusCode) -> bool {
        status.is_success()
            || (self.step == RegistrationStep::Delete && status == StatusCode::NOT_FOUND)
    }
}

/// Fully-read answer from the gateway.
#[derive(Debug, Clone)]
pub struct AdminResponse {
    pub status: StatusCode,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(step: RegistrationStep) -> AdminCall {
        AdminCall {
            step,
            method: Method::POST,
            url: "http://kong:8001/apis".into(),
            form: None,
        }
    }

    #[test]
    fn delete_tolerates_missing_entry() {
        assert!(call(RegistrationStep::Delete).accepts(StatusCode::NOT_FOUND));
        assert!(call(RegistrationStep::Delete).accepts(StatusCode::NO_CONTENT));
    }

    #[test]
    fn other_steps_reject_not_found() {
        for step in [
            RegistrationStep::Create,
            RegistrationStep::KeyAuth,
            RegistrationStep::Acl,
        ] {
            assert!(!call(step).accepts(StatusCode::NOT_FOUND), "{step}");
            assert!(call(step).accepts(StatusCode::CREATED), "{step}");
        }
    }

    #[test]
    fn server_errors_are_rejected() {
        assert!(!call(RegistrationStep::Delete).accepts(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!call(RegistrationStep::Acl).accepts(StatusCode::CONFLICT));
    }
}
