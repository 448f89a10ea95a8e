use crate::config::ConfigError;
use crate::validation::ValidationError;

use super::oauth2::AuthError;

/// Errors that can occur when using the [`ApiClient`](super::ApiClient).
///
/// Configuration and validation errors are raised before any network call.
/// Business failures reported by the API (4xx/5xx) are not errors: they come
/// back as an [`ApiResult`](super::ApiResult) with `ok == false`.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// Invalid or incomplete configuration.
    #[display("Configuration error: {_0}")]
    Config(ConfigError),

    /// The token endpoint refused or garbled the token exchange.
    #[display("Authentication error: {_0}")]
    Auth(AuthError),

    /// Request parameters violate the operation's rules.
    #[display("Validation error: {_0}")]
    Validation(ValidationError),

    /// The request never produced an HTTP response.
    #[display("Transport error: {_0}")]
    Transport(TransportError),

    /// The underlying HTTP client could not be built.
    #[display("Failed to build HTTP client: {_0}")]
    HttpClientError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    #[display("Invalid request URL: {_0}")]
    UrlError(url::ParseError),

    /// JSON serialization error for request bodies.
    #[display("JSON serialization error: {_0}")]
    JsonValueError(serde_json::Error),

    /// Query or form serialization error.
    #[display("Form serialization error: {_0}")]
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// A value that cannot be carried as a query parameter.
    #[display("Unsupported parameter value for '{name}': {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// Parameter name.
        name: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// The access token cannot be carried in an `Authorization` header.
    #[display("Access token contains characters that are invalid in a header")]
    #[from(skip)]
    InvalidBearerToken,
}

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransportErrorKind {
    /// Connect or request timeout elapsed.
    #[display("timeout")]
    Timeout,
    /// DNS resolution or TCP/TLS connection failed.
    #[display("connect")]
    Connect,
    /// Any other failure (reset, body read, protocol).
    #[display("other")]
    Other,
}

/// A network-level failure: no HTTP response could be obtained.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{kind} error calling {endpoint}: {message}")]
pub struct TransportError {
    /// Failure classification.
    pub kind: TransportErrorKind,
    /// The URL that was being called.
    pub endpoint: String,
    /// Description from the HTTP stack.
    pub message: String,
}

impl TransportError {
    pub(crate) fn from_reqwest(endpoint: impl Into<String>, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self {
            kind,
            endpoint: endpoint.into(),
            message: error.to_string(),
        }
    }
}
