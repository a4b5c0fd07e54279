use autokong_sdk::RegistrationStep;
use http::Method;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::model::{API_KEY_HEADER, AdminCall, ApiRegistration};

// Form fields are declared in sorted key order, matching the legacy encoding.

#[derive(Serialize)]
struct CreateApiForm<'a> {
    name: &'a str,
    request_path: &'a str,
    strip_request_path: bool,
    upstream_url: &'a str,
}

#[derive(Serialize)]
struct KeyAuthPluginForm<'a> {
    #[serde(rename = "config.key_names")]
    key_names: &'a str,
    name: &'static str,
}

#[derive(Serialize)]
struct AclPluginForm<'a> {
    #[serde(rename = "config.whitelist")]
    whitelist: &'a str,
    name: &'static str,
}

/// `{base}/apis`
pub fn apis_url(base: &str) -> String {
    format!("{base}/apis")
}

/// `{base}/apis/{name}`
pub fn api_url(base: &str, name: &str) -> String {
    format!("{base}/apis/{name}")
}

/// `{base}/apis/{name}/plugins`
pub fn plugins_url(base: &str, name: &str) -> String {
    format!("{base}/apis/{name}/plugins")
}

fn encode<T: Serialize>(step: RegistrationStep, form: &T) -> Result<String, DomainError> {
    serde_urlencoded::to_string(form)
        .map_err(|e| DomainError::invalid_request(format!("{step} form: {e}")))
}

pub fn delete_api(base: &str, name: &str) -> AdminCall {
    AdminCall {
        step: RegistrationStep::Delete,
        method: Method::DELETE,
        url: api_url(base, name),
        form: None,
    }
}

/// # Errors
/// Returns `DomainError::InvalidRequest` if the form cannot be encoded.
pub fn create_api(base: &str, registration: &ApiRegistration) -> Result<AdminCall, DomainError> {
    let form = CreateApiForm {
        name: &registration.name,
        request_path: &registration.path,
        strip_request_path: true,
        upstream_url: &registration.url,
    };
    Ok(AdminCall {
        step: RegistrationStep::Create,
        method: Method::POST,
        url: apis_url(base),
        form: Some(encode(RegistrationStep::Create, &form)?),
    })
}

/// # Errors
/// Returns `DomainError::InvalidRequest` if the form cannot be encoded.
pub fn key_auth_plugin(base: &str, name: &str) -> Result<AdminCall, DomainError> {
    let form = KeyAuthPluginForm {
        key_names: API_KEY_HEADER,
        name: "key-auth",
    };
    Ok(AdminCall {
        step: RegistrationStep::KeyAuth,
        method: Method::POST,
        url: plugins_url(base, name),
        form: Some(encode(RegistrationStep::KeyAuth, &form)?),
    })
}

/// # Errors
/// Returns `DomainError::InvalidRequest` if the form cannot be encoded.
pub fn acl_plugin(base: &str, name: &str, groups: &str) -> Result<AdminCall, DomainError> {
    let form = AclPluginForm {
        whitelist: groups,
        name: "acl",
    };
    Ok(AdminCall {
        step: RegistrationStep::Acl,
        method: Method::POST,
        url: plugins_url(base, name),
        form: Some(encode(RegistrationStep::Acl, &form)?),
    })
}
