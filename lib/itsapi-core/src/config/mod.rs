//! Client configuration: credentials, target API and optional program context.
//!
//! Configuration is usually produced by [`load`] from one of the supported
//! [`ConfigSource`]s, but it can also be assembled by hand:
//!
//! ```rust
//! use itsapi_core::config::{ApiConfig, Credentials};
//!
//! # fn example() -> Result<(), itsapi_core::config::ConfigError> {
//! let credentials = Credentials::new("my-client", "my-secret", "https://auth.example.com/token")?
//!     .with_scope("its-api");
//! let config = ApiConfig::new("https://api.example.com/v1", credentials)?
//!     .with_program_id("238");
//! assert_eq!(config.program_id(), Some("238"));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::client::SecureString;

mod error;
pub use self::error::ConfigError;

mod loader;
pub use self::loader::{ConfigKey, ConfigSource, load};

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default whole-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// OAuth2 client-credentials settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: SecureString,
    token_url: Url,
    scope: Option<String>,
}

impl Credentials {
    /// Creates credentials for the client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `token_url` is not an absolute URL.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        token_url: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let token_url = parse_url("token_url", token_url.as_ref())?;
        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url,
            scope: None,
        })
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// The OAuth2 client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The OAuth2 client secret.
    pub fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    /// The token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// The requested scope, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url.as_str())
            .field("scope", &self.scope)
            .finish()
    }
}

/// Connect and request timeouts applied by the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect timeout.
    pub connect: Duration,
    /// Whole-request timeout, body included.
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            request: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Complete configuration of an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    credentials: Credentials,
    program_id: Option<String>,
    program_institution_id: Option<String>,
    parent_program_institution_id: Option<String>,
    vendor_id: Option<String>,
    sponsor_id: Option<String>,
    timeouts: Timeouts,
}

impl ApiConfig {
    /// Creates a configuration with only the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: impl AsRef<str>, credentials: Credentials) -> Result<Self, ConfigError> {
        let base_url = parse_url("base_url", base_url.as_ref())?;
        Ok(Self {
            base_url,
            credentials,
            program_id: None,
            program_institution_id: None,
            parent_program_institution_id: None,
            vendor_id: None,
            sponsor_id: None,
            timeouts: Timeouts::default(),
        })
    }

    /// Sets the default `program-id`.
    #[must_use]
    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = Some(program_id.into());
        self
    }

    /// Sets the default `program-institution-id`.
    #[must_use]
    pub fn with_program_institution_id(mut self, id: impl Into<String>) -> Self {
        self.program_institution_id = Some(id.into());
        self
    }

    /// Sets the default `parent-program-institution-id`.
    #[must_use]
    pub fn with_parent_program_institution_id(mut self, id: impl Into<String>) -> Self {
        self.parent_program_institution_id = Some(id.into());
        self
    }

    /// Sets the default `vendor-id`.
    #[must_use]
    pub fn with_vendor_id(mut self, id: impl Into<String>) -> Self {
        self.vendor_id = Some(id.into());
        self
    }

    /// Sets the default `sponsor-id`.
    #[must_use]
    pub fn with_sponsor_id(mut self, id: impl Into<String>) -> Self {
        self.sponsor_id = Some(id.into());
        self
    }

    /// Overrides the HTTP timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The OAuth2 credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The default `program-id`, if configured.
    pub fn program_id(&self) -> Option<&str> {
        self.program_id.as_deref()
    }

    /// The default `program-institution-id`, if configured.
    pub fn program_institution_id(&self) -> Option<&str> {
        self.program_institution_id.as_deref()
    }

    /// The default `parent-program-institution-id`, if configured.
    pub fn parent_program_institution_id(&self) -> Option<&str> {
        self.parent_program_institution_id.as_deref()
    }

    /// The default `vendor-id`, if configured.
    pub fn vendor_id(&self) -> Option<&str> {
        self.vendor_id.as_deref()
    }

    /// The default `sponsor-id`, if configured.
    pub fn sponsor_id(&self) -> Option<&str> {
        self.sponsor_id.as_deref()
    }

    /// The HTTP timeouts.
    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Returns the configured default for an injectable query parameter.
    pub(crate) fn default_for(&self, parameter: &str) -> Option<&str> {
        match parameter {
            "program-id" => self.program_id(),
            "program-institution-id" => self.program_institution_id(),
            _ => None,
        }
    }
}

pub(crate) fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}
