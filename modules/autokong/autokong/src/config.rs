use std::fmt;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use url::Url;

/// Environment variable holding the gateway admin base address.
pub const KONG_URL_ENV: &str = "KONG_URL";

/// Errors raised while loading [`RelayConfig`]. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{KONG_URL_ENV} is not set")]
    Missing,

    #[error("{KONG_URL_ENV} '{value}' is invalid: {reason}")]
    Invalid { value: String, reason: String },

    #[error("failed to read configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    kong_url: Option<String>,
}

/// Configuration for the registration relay.
///
/// The gateway base address is validated once and never changes afterwards;
/// it is handed to the Kong admin client explicitly rather than read from the
/// environment on each request.
#[derive(Clone)]
pub struct RelayConfig {
    kong_url: String,
}

impl RelayConfig {
    /// Validate `kong_url` and build the config.
    ///
    /// The address must be an absolute `http`/`https` URL with a host and no
    /// query or fragment. Trailing slashes are trimmed.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] for an empty value and
    /// [`ConfigError::Invalid`] for anything that is not a usable base URL.
    pub fn new(kong_url: &str) -> Result<Self, ConfigError> {
        let trimmed = kong_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Missing);
        }

        let invalid = |reason: &str| ConfigError::Invalid {
            value: redact_url(trimmed),
            reason: reason.to_owned(),
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }

        Ok(Self {
            kong_url: trimmed.trim_end_matches('/').to_owned(),
        })
    }

    /// Load from the process environment (`KONG_URL`).
    ///
    /// # Errors
    /// See [`RelayConfig::new`]; also fails if the environment cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::new().merge(Env::raw().only(&[KONG_URL_ENV])))
    }

    /// Load from an arbitrary figment. The key is `kong_url`.
    ///
    /// # Errors
    /// See [`RelayConfig::new`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawConfig = figment.extract().map_err(Box::new)?;
        match raw.kong_url {
            Some(value) => Self::new(&value),
            None => Err(ConfigError::Missing),
        }
    }

    /// Gateway admin base address, without trailing slash.
    #[must_use]
    pub fn kong_url(&self) -> &str {
        &self.kong_url
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("kong_url", &redact_url(&self.kong_url))
            .finish()
    }
}

/// Mask the password of a URL with userinfo, leaving everything else intact.
pub(crate) fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("REDACTED")).is_err() {
                return "[unparseable url]".to_owned();
            }
            url.to_string()
        }
        Ok(_) => raw.to_owned(),
        Err(_) => "[unparseable url]".to_owned(),
    }
}
