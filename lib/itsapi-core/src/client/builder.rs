use std::sync::Arc;
use std::time::Duration;

use super::oauth2::http_client;
use super::{ApiClient, ApiClientError, TokenManager};
use crate::config::{ApiConfig, ConfigError, Timeouts};

/// Builder for [`ApiClient`].
///
/// # Default Configuration
///
/// - **Timeouts**: taken from the [`ApiConfig`] (5 s connect, 15 s request
///   unless configured otherwise)
/// - **Token manager**: a fresh one built from the configured credentials
/// - **Parameter injection**: disabled
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use itsapi_core::ApiClient;
/// use itsapi_core::config::{ApiConfig, Credentials};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("client", "secret", "https://auth.example.com/token")?;
/// let config = ApiConfig::new("https://api.example.com", credentials)?.with_program_id("238");
///
/// let client = ApiClient::builder()
///     .with_config(config)
///     .with_request_timeout(Duration::from_secs(30))
///     .with_parameter_injection(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    tokens: Option<TokenManager>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    inject_defaults: bool,
}

impl ApiClientBuilder {
    /// Sets the configuration; required.
    #[must_use]
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing token manager instead of building one.
    #[must_use]
    pub fn with_token_manager(mut self, tokens: TokenManager) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Overrides both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.connect_timeout = Some(timeouts.connect);
        self.request_timeout = Some(timeouts.request);
        self
    }

    /// Overrides the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the whole-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Fills `program-id` and `program-institution-id` from the configuration
    /// when an operation declares them and the caller left them out.
    #[must_use]
    pub fn with_parameter_injection(mut self, enabled: bool) -> Self {
        self.inject_defaults = enabled;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Config`] when no configuration was given,
    /// - [`ApiClientError::HttpClientError`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            config,
            tokens,
            connect_timeout,
            request_timeout,
            inject_defaults,
        } = self;

        let config = config.ok_or(ConfigError::Missing {
            fields: vec!["base_url", "client_id", "client_secret", "token_url"],
        })?;

        let defaults = config.timeouts();
        let timeouts = Timeouts {
            connect: connect_timeout.unwrap_or(defaults.connect),
            request: request_timeout.unwrap_or(defaults.request),
        };
        let http = http_client(timeouts)?;

        let tokens = match tokens {
            Some(tokens) => tokens,
            None => TokenManager::builder(config.credentials().clone())
                .with_http_client(http.clone())
                .build()?,
        };

        Ok(ApiClient {
            config: Arc::new(config),
            tokens,
            http,
            inject_defaults,
        })
    }
}
