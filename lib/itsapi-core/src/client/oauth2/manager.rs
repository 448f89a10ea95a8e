use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use headers::{ContentType, HeaderMapExt};
use http::HeaderMap;
use http::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::error::AuthError;
use super::token::{CachedToken, TokenCache};
use crate::client::{ApiClientError, BearerToken, TransportError};
use crate::config::{Credentials, Timeouts};

/// Default margin before expiry at which a cached token is considered stale.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_secs(30);

/// Acquires, caches and refreshes the client-credentials access token.
///
/// Clones share the same cache, so one manager can serve many clients.
/// Concurrent callers that find the cache stale are coalesced: only one of
/// them talks to the token endpoint, the others reuse its result.
///
/// # Example
///
/// ```rust,no_run
/// use itsapi_core::TokenManager;
/// use itsapi_core::config::Credentials;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("client", "secret", "https://auth.example.com/token")?;
/// let manager = TokenManager::builder(credentials).build()?;
///
/// let token = manager.get_token().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenManager {
    credentials: Arc<Credentials>,
    http: reqwest::Client,
    cache: TokenCache,
    refresh_lock: Arc<Mutex<()>>,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
}

impl TokenManager {
    /// Creates a builder for the given credentials.
    pub fn builder(credentials: Credentials) -> TokenManagerBuilder {
        TokenManagerBuilder::new(credentials)
    }

    /// Returns a valid bearer token, requesting a new one when needed.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] when the token endpoint answers non-2xx,
    /// - [`AuthError::InvalidTokenResponse`] when the payload is unusable,
    /// - [`TransportError`] when the token endpoint cannot be reached.
    ///
    /// Nothing is cached on failure.
    pub async fn get_token(&self) -> Result<BearerToken, ApiClientError> {
        if let Some(token) = self.fresh().await {
            return Ok(token.to_bearer());
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.fresh().await {
            debug!("access token refreshed by a concurrent caller");
            return Ok(token.to_bearer());
        }

        let token = self.request_token().await?;
        let bearer = token.to_bearer();
        self.cache.set(token).await;
        Ok(bearer)
    }

    /// Returns the cached token if it is still fresh, without refreshing.
    pub async fn cached(&self) -> Option<BearerToken> {
        self.fresh().await.map(|token| token.to_bearer())
    }

    /// Drops the cached token; the next [`get_token`](Self::get_token) fetches a new one.
    pub async fn invalidate(&self) {
        debug!("invalidating cached access token");
        self.cache.clear().await;
    }

    /// Drops the cached token only if it is still `token`.
    ///
    /// A token refreshed by a concurrent caller is kept. Returns `true` when
    /// the cache was cleared.
    pub async fn invalidate_if(&self, token: &BearerToken) -> bool {
        let cleared = self.cache.clear_if(token.as_str()).await;
        if cleared {
            debug!("invalidating rejected access token");
        } else {
            debug!("rejected access token already replaced");
        }
        cleared
    }

    /// The margin subtracted from the token expiry.
    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// The credentials used for the exchange.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn fresh(&self) -> Option<CachedToken> {
        let now = self.clock.now_epoch_ms();
        self.cache.get_fresh(now, self.safety_margin).await
    }

    async fn request_token(&self) -> Result<CachedToken, ApiClientError> {
        let credentials = &self.credentials;
        let endpoint = credentials.token_url().as_str();

        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret().as_str()),
        ];
        if let Some(scope) = credentials.scope() {
            form.push(("scope", scope));
        }
        let body = serde_urlencoded::to_string(&form)?;

        let mut headers = HeaderMap::new();
        headers.typed_insert(ContentType::form_url_encoded());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let issued_at = self.clock.now_epoch_ms();
        debug!(
            token_url = endpoint,
            client_id = credentials.client_id(),
            "requesting access token"
        );
        let response = self
            .http
            .post(credentials.token_url().clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|err| TransportError::from_reqwest(endpoint, &err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::from_reqwest(endpoint, &err))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "token request rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let token = parse_token_response(&text, issued_at)?;
        info!(
            expires_at_epoch_ms = token.expires_at_epoch_ms(),
            "access token acquired"
        );
        Ok(token)
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("clock", &self.clock)
            .field("safety_margin", &self.safety_margin)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<Value>,
}

fn parse_token_response(text: &str, issued_at: u64) -> Result<CachedToken, AuthError> {
    let invalid = |reason: &str| AuthError::InvalidTokenResponse {
        reason: reason.to_string(),
    };

    let payload = serde_json::from_str::<TokenResponse>(text)
        .map_err(|err| invalid(&format!("not a JSON token document: {err}")))?;

    let access_token = payload
        .access_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| invalid("missing access_token"))?;

    let expires_in = match payload.expires_in {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid("missing or invalid expires_in"))?;

    Ok(CachedToken::issued(
        access_token,
        issued_at,
        Duration::from_secs(expires_in),
    ))
}

/// Builder for [`TokenManager`].
#[derive(Debug)]
pub struct TokenManagerBuilder {
    credentials: Credentials,
    http: Option<reqwest::Client>,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
    timeouts: Timeouts,
}

impl TokenManagerBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http: None,
            clock: Arc::new(SystemClock),
            safety_margin: DEFAULT_SAFETY_MARGIN,
            timeouts: Timeouts::default(),
        }
    }

    /// Sets the margin subtracted from the token expiry.
    #[must_use]
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Replaces the wall clock, typically with a [`ManualClock`](super::ManualClock) in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Uses an existing HTTP client for the token exchange.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Sets the timeouts of the token request.
    ///
    /// Ignored when a client is supplied with [`with_http_client`](Self::with_http_client).
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Builds the manager with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::HttpClientError`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<TokenManager, ApiClientError> {
        let Self {
            credentials,
            http,
            clock,
            safety_margin,
            timeouts,
        } = self;

        let http = match http {
            Some(client) => client,
            None => http_client(timeouts)?,
        };

        Ok(TokenManager {
            credentials: Arc::new(credentials),
            http,
            cache: TokenCache::new(),
            refresh_lock: Arc::new(Mutex::new(())),
            clock,
            safety_margin,
        })
    }
}

/// Builds the HTTP client shared by the token exchange and API calls.
pub(crate) fn http_client(timeouts: Timeouts) -> Result<reqwest::Client, ApiClientError> {
    let client = reqwest::Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(ApiClientError::HttpClientError)?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_token_response() {
        let token = parse_token_response(
            r#"{"access_token":"tok1","token_type":"Bearer","expires_in":3600}"#,
            1_000,
        )
        .expect("valid token");

        assert_eq!(token.access_token(), "tok1");
        assert_eq!(token.expires_at_epoch_ms(), 3_601_000);
    }

    #[test]
    fn should_accept_string_expires_in() {
        let token = parse_token_response(r#"{"access_token":"tok","expires_in":"60"}"#, 0)
            .expect("valid token");
        assert_eq!(token.expires_at_epoch_ms(), 60_000);
    }

    #[test]
    fn should_reject_missing_access_token() {
        let error = parse_token_response(r#"{"expires_in":3600}"#, 0).expect_err("should fail");
        assert_eq!(
            error,
            AuthError::InvalidTokenResponse {
                reason: "missing access_token".to_string()
            }
        );
    }

    #[test]
    fn should_reject_missing_expires_in() {
        let error = parse_token_response(r#"{"access_token":"tok"}"#, 0).expect_err("should fail");
        assert_eq!(
            error,
            AuthError::InvalidTokenResponse {
                reason: "missing or invalid expires_in".to_string()
            }
        );
    }

    #[test]
    fn should_reject_non_json_payload() {
        let error = parse_token_response("<html>oops</html>", 0).expect_err("should fail");
        assert!(matches!(error, AuthError::InvalidTokenResponse { .. }));
    }

    #[tokio::test]
    async fn should_keep_token_refreshed_by_another_caller() {
        let credentials = Credentials::new("client", "secret", "https://auth.example.com/token")
            .expect("valid credentials");
        let manager = TokenManager::builder(credentials)
            .build()
            .expect("should build");
        manager.cache.set(CachedToken::new("tok2", u64::MAX)).await;

        let stale = manager.invalidate_if(&BearerToken::new("tok1")).await;
        assert!(!stale);
        assert_eq!(
            manager.cached().await.map(|token| token.as_str().to_string()),
            Some(String::from("tok2"))
        );

        let current = manager.invalidate_if(&BearerToken::new("tok2")).await;
        assert!(current);
        assert!(manager.cached().await.is_none());
    }

    #[test]
    fn should_default_safety_margin() {
        let credentials = Credentials::new("client", "secret", "https://auth.example.com/token")
            .expect("valid credentials");
        let manager = TokenManager::builder(credentials)
            .build()
            .expect("should build");

        assert_eq!(manager.safety_margin(), Duration::from_secs(30));
    }
}
