use std::sync::Arc;
use std::time::Instant;

use headers::{ContentType, HeaderMapExt};
use http::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use http::{Method, StatusCode};
use reqwest::{Body, Request};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::catalog::{Catalog, Operation};
use crate::config::ApiConfig;
use crate::validation::{self, ValidationError};

mod auth;
pub use self::auth::{BearerToken, SecureString};

mod builder;
pub use self::builder::ApiClientBuilder;

mod error;
pub use self::error::{ApiClientError, TransportError, TransportErrorKind};

pub mod oauth2;
pub use self::oauth2::TokenManager;

mod parameters;
pub use self::parameters::*;

mod result;
pub use self::result::{ApiResult, ResponseBody};

/// Parameters filled from [`ApiConfig`] when injection is enabled.
const INJECTABLE_PARAMETERS: &[&str] = &["program-id", "program-institution-id"];

/// Authenticated client of the ITS API.
///
/// Every call follows the same pipeline: catalogue lookup, parameter
/// validation, token acquisition, then the HTTP exchange. Validation
/// failures return before the token manager or the API is contacted.
///
/// # Example
///
/// ```rust,no_run
/// use itsapi_core::config::{ConfigSource, load};
/// use itsapi_core::{ApiClient, RequestParameters};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load(ConfigSource::Environment)?;
/// let client = ApiClient::builder().with_config(config).build()?;
///
/// let params = RequestParameters::new()
///     .add_param("program-id", "238")
///     .add_param("active-only", true);
/// let result = client.call("eventQuery", params, None).await?;
///
/// println!("{} in {:?}", result.status(), result.elapsed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    tokens: TokenManager,
    http: reqwest::Client,
    inject_defaults: bool,
}

// Create
impl ApiClient {
    /// Creates a builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The configuration in use.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The token manager, shared by clones of this client.
    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }
}

// Calls
impl ApiClient {
    /// Executes a request against `path`.
    ///
    /// When `(method, path)` matches a catalogue operation exactly, the
    /// parameters and body are validated first. Other paths are sent as is.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Validation`] before any network call,
    /// - [`ApiClientError::Auth`] or [`ApiClientError::Transport`] from the
    ///   token exchange,
    /// - [`ApiClientError::Transport`] when the API cannot be reached.
    ///
    /// Non-2xx answers are returned as [`ApiResult`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: RequestParameters,
        body: Option<Value>,
    ) -> Result<ApiResult, ApiClientError> {
        let operation = Catalog::bundled().find(&method, path);
        if operation.is_none() {
            debug!(%method, path, "no catalogue entry, sending without validation");
        }
        self.dispatch(operation, method, path, params, body).await
    }

    /// Executes a catalogue operation by name, e.g. `eventQuery`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), plus an unknown operation
    /// [`ApiClientError::Validation`] error.
    pub async fn call(
        &self,
        operation: &str,
        params: RequestParameters,
        body: Option<Value>,
    ) -> Result<ApiResult, ApiClientError> {
        let Some(found) = Catalog::bundled().get(operation) else {
            return Err(ValidationError::unknown_operation(operation).into());
        };
        self.dispatch(Some(found), found.method().clone(), found.path(), params, body)
            .await
    }

    /// Executes the operation bound to a typed parameter record.
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call).
    pub async fn send<P: OperationParams>(
        &self,
        record: &P,
        body: Option<Value>,
    ) -> Result<ApiResult, ApiClientError> {
        let params = record.to_parameters()?;
        self.call(P::OPERATION, params, body).await
    }

    /// `GET` shortcut for [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn get(
        &self,
        path: &str,
        params: RequestParameters,
    ) -> Result<ApiResult, ApiClientError> {
        self.execute(Method::GET, path, params, None).await
    }

    /// `POST` shortcut for [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn post(
        &self,
        path: &str,
        params: RequestParameters,
        body: Value,
    ) -> Result<ApiResult, ApiClientError> {
        self.execute(Method::POST, path, params, Some(body)).await
    }

    /// `PUT` shortcut for [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn put(
        &self,
        path: &str,
        params: RequestParameters,
        body: Value,
    ) -> Result<ApiResult, ApiClientError> {
        self.execute(Method::PUT, path, params, Some(body)).await
    }

    /// `PATCH` shortcut for [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn patch(
        &self,
        path: &str,
        params: RequestParameters,
        body: Value,
    ) -> Result<ApiResult, ApiClientError> {
        self.execute(Method::PATCH, path, params, Some(body)).await
    }

    /// `DELETE` shortcut for [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn delete(
        &self,
        path: &str,
        params: RequestParameters,
        body: Option<Value>,
    ) -> Result<ApiResult, ApiClientError> {
        self.execute(Method::DELETE, path, params, body).await
    }

    async fn dispatch(
        &self,
        operation: Option<&Operation>,
        method: Method,
        path: &str,
        mut params: RequestParameters,
        body: Option<Value>,
    ) -> Result<ApiResult, ApiClientError> {
        let mut injected = vec![];
        if let Some(operation) = operation {
            if self.inject_defaults {
                injected = self.fill_defaults(operation, &mut params);
            }
            validation::validate(operation.name(), &params)?;
            validation::validate_body(operation.name(), body.as_ref())?;
        }

        let token = self.tokens.get_token().await?;
        let url = self.build_url(path, &params)?;
        let endpoint = format!("{method} {path}");
        let request = build_request(method, url, &token, body.as_ref())?;

        let started = Instant::now();
        debug!(?request, "sending...");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|err| TransportError::from_reqwest(&endpoint, &err))?;
        debug!(?response, "...receiving");

        let result = ApiResult::from_response(response, &endpoint, started, injected).await?;
        if result.status() == StatusCode::UNAUTHORIZED {
            warn!(%endpoint, "access token refused");
            self.tokens.invalidate_if(&token).await;
        }
        Ok(result)
    }

    fn fill_defaults(&self, operation: &Operation, params: &mut RequestParameters) -> Vec<String> {
        let mut injected = vec![];
        for name in INJECTABLE_PARAMETERS {
            if !operation.declares(name) || params.is_present(name) {
                continue;
            }
            if let Some(value) = self.config.default_for(name) {
                info!(
                    operation = operation.name(),
                    parameter = *name,
                    "injecting configured default"
                );
                params.insert(*name, value);
                injected.push((*name).to_string());
            }
        }
        injected
    }

    fn build_url(&self, path: &str, params: &RequestParameters) -> Result<Url, ApiClientError> {
        let base = self.config.base_url().as_str();
        let url = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = url.parse::<Url>()?;

        let query = params.to_query_string()?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        Ok(url)
    }
}

fn build_request(
    method: Method,
    url: Url,
    token: &BearerToken,
    body: Option<&Value>,
) -> Result<Request, ApiClientError> {
    let sends_body = !matches!(method, Method::GET | Method::HEAD);
    let mut request = Request::new(method, url);
    let headers = request.headers_mut();

    let authorization = token
        .to_authorization()
        .ok_or(ApiClientError::InvalidBearerToken)?;
    headers.typed_insert(authorization);
    if let Some(value) = headers.get_mut(AUTHORIZATION) {
        value.set_sensitive(true);
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(body) = body.filter(|_| sends_body) {
        headers.typed_insert(ContentType::json());
        let data = serde_json::to_vec(body)?;
        *request.body_mut() = Some(Body::from(data));
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn token() -> BearerToken {
        BearerToken::new("tok1")
    }

    fn url() -> Url {
        Url::parse("https://api.example.com/event/create").expect("valid url")
    }

    #[test]
    fn should_attach_bearer_and_accept_headers() {
        let request = build_request(Method::GET, url(), &token(), None).expect("valid request");

        let headers = request.headers();
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
            Some("Bearer tok1")
        );
        assert!(headers.get(AUTHORIZATION).is_some_and(HeaderValue::is_sensitive));
        assert_eq!(
            headers.get(ACCEPT).and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn should_send_json_body_for_writes() {
        let body = json!({"eventDescription": "Spring"});

        let request =
            build_request(Method::POST, url(), &token(), Some(&body)).expect("valid request");

        assert_eq!(
            request.headers().typed_get::<ContentType>(),
            Some(ContentType::json())
        );
        let sent = request
            .body()
            .and_then(Body::as_bytes)
            .expect("body should be buffered");
        assert_eq!(
            serde_json::from_slice::<Value>(sent).expect("valid json"),
            body
        );
    }

    #[test]
    fn should_ignore_body_for_get() {
        let body = json!({"ignored": true});

        let request =
            build_request(Method::GET, url(), &token(), Some(&body)).expect("valid request");

        assert!(request.body().is_none());
        assert!(request.headers().typed_get::<ContentType>().is_none());
    }

    #[test]
    fn should_never_log_token_in_request_debug() {
        let request = build_request(Method::GET, url(), &token(), None).expect("valid request");

        let debug = format!("{request:?}");

        assert!(!debug.contains("tok1"), "{debug}");
    }
}
