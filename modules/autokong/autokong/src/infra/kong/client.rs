use std::error::Error as StdError;

use http::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::config::{RelayConfig, redact_url};
use crate::domain::error::DomainError;
use crate::domain::model::{AdminCall, AdminResponse, ApiRegistration, FORM_CONTENT_TYPE};
use crate::domain::services::KongAdmin;

use super::request_builder;

/// Longest slice of a gateway error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Kong admin API client. One instance is shared by all requests.
///
/// Apart from skipping proxies for loopback hosts, the `reqwest` defaults are
/// used as-is: no retries and no timeout override.
pub struct KongAdminClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl KongAdminClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        // Loopback admin APIs are never reached through an environment proxy.
        if is_loopback(config.kong_url()) {
            builder = builder.no_proxy();
        }
        let http_client = builder.build()?;
        Ok(Self {
            http_client,
            base_url: config.kong_url().to_owned(),
        })
    }

    /// Send one admin call and read its response to the end.
    ///
    /// Only transport failures are errors here; status handling is left to
    /// [`KongAdminClient::execute`].
    ///
    /// # Errors
    /// Returns `DomainError::Transport` if no complete response was received.
    pub async fn send(&self, call: &AdminCall) -> Result<AdminResponse, DomainError> {
        let mut request = self
            .http_client
            .request(call.method.clone(), &call.url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        if let Some(form) = &call.form {
            request = request.body(form.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(call, e))?;

        let status = response.status();
        // Reading the body releases the connection on both success and error paths.
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(call, e))?;

        debug!(
            step = call.step.as_str(),
            method = %call.method,
            url = %redact_url(&call.url),
            status = status.as_u16(),
            "Gateway responded"
        );

        Ok(AdminResponse { status, body })
    }

    /// Send `call` and turn a status the step does not accept into an error.
    async fn execute(&self, call: AdminCall) -> Result<(), DomainError> {
        let response = self.send(&call).await?;
        if call.accepts(response.status) {
            return Ok(());
        }
        let body: String = response.body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        Err(DomainError::unexpected_status(
            &call.method,
            &call.url,
            response.status,
            body.trim(),
        ))
    }
}

#[async_trait::async_trait]
impl KongAdmin for KongAdminClient {
    async fn delete_api(&self, name: &str) -> Result<(), DomainError> {
        info!(name = %name, "Deleting api");
        self.execute(request_builder::delete_api(&self.base_url, name))
            .await
    }

    async fn create_api(&self, registration: &ApiRegistration) -> Result<(), DomainError> {
        info!(name = %registration.name, "Registering api");
        let call = request_builder::create_api(&self.base_url, registration)?;
        self.execute(call).await
    }

    async fn add_key_auth(&self, name: &str) -> Result<(), DomainError> {
        info!(name = %name, "Adding key-auth plugin to api");
        let call = request_builder::key_auth_plugin(&self.base_url, name)?;
        self.execute(call).await
    }

    async fn add_acl(&self, name: &str, groups: &str) -> Result<(), DomainError> {
        info!(name = %name, "Adding acl plugin to api");
        let call = request_builder::acl_plugin(&self.base_url, name, groups)?;
        self.execute(call).await
    }
}

/// `reqwest` puts the raw URL, credentials included, into its error text.
/// The URL is dropped here; [`DomainError`] carries a masked copy.
fn transport_error(call: &AdminCall, err: reqwest::Error) -> DomainError {
    DomainError::transport(&call.method, &call.url, error_chain(&err.without_url()))
}

fn is_loopback(base_url: &str) -> bool {
    let Ok(url) = url::Url::parse(base_url) else {
        return false;
    };
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// `reqwest` hides the interesting part (connection refused, DNS) in the source chain.
fn error_chain(err: &dyn StdError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        source = inner.source();
    }
    detail
}
