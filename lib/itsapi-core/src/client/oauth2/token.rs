//! OAuth2 token types and caching.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::BearerToken;

/// An access token with its absolute expiry.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CachedToken {
    access_token: String,
    #[zeroize(skip)]
    expires_at_epoch_ms: u64,
}

impl CachedToken {
    /// Creates a token expiring at the given instant.
    pub fn new(access_token: impl Into<String>, expires_at_epoch_ms: u64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at_epoch_ms,
        }
    }

    /// Creates a token issued at `issued_at_epoch_ms` and valid for `expires_in`.
    pub fn issued(
        access_token: impl Into<String>,
        issued_at_epoch_ms: u64,
        expires_in: Duration,
    ) -> Self {
        let lifetime = u64::try_from(expires_in.as_millis()).unwrap_or(u64::MAX);
        Self::new(access_token, issued_at_epoch_ms.saturating_add(lifetime))
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Absolute expiry in milliseconds since the Unix epoch.
    pub fn expires_at_epoch_ms(&self) -> u64 {
        self.expires_at_epoch_ms
    }

    /// A token is usable while `now < expires_at - margin`.
    pub fn is_fresh(&self, now_epoch_ms: u64, margin: Duration) -> bool {
        let margin = u64::try_from(margin.as_millis()).unwrap_or(u64::MAX);
        now_epoch_ms < self.expires_at_epoch_ms.saturating_sub(margin)
    }

    pub(crate) fn to_bearer(&self) -> BearerToken {
        BearerToken::new(self.access_token.as_str())
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at_epoch_ms", &self.expires_at_epoch_ms)
            .finish()
    }
}

/// Shared slot holding the current token.
///
/// The slot is replaced wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenCache {
    inner: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token when it is still fresh.
    pub(crate) async fn get_fresh(&self, now_epoch_ms: u64, margin: Duration) -> Option<CachedToken> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|token| token.is_fresh(now_epoch_ms, margin))
            .cloned()
    }

    pub(crate) async fn set(&self, token: CachedToken) {
        let mut guard = self.inner.write().await;
        *guard = Some(token);
    }

    pub(crate) async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }

    /// Clears the slot only while it still holds `access_token`.
    pub(crate) async fn clear_if(&self, access_token: &str) -> bool {
        let mut guard = self.inner.write().await;
        let matches = guard
            .as_ref()
            .is_some_and(|token| token.access_token() == access_token);
        if matches {
            *guard = None;
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: Duration = Duration::from_secs(30);

    #[test]
    fn should_compute_expiry_from_issue_time() {
        let token = CachedToken::issued("tok", 1_000, Duration::from_secs(3600));
        assert_eq!(token.expires_at_epoch_ms(), 3_601_000);
    }

    #[test]
    fn should_apply_safety_margin() {
        let token = CachedToken::new("tok", 100_000);

        assert!(token.is_fresh(69_999, MARGIN));
        assert!(!token.is_fresh(70_000, MARGIN));
        assert!(!token.is_fresh(100_000, Duration::ZERO));
    }

    #[test]
    fn should_never_be_fresh_when_lifetime_is_below_margin() {
        let token = CachedToken::issued("tok", 0, Duration::from_secs(10));
        assert!(!token.is_fresh(0, MARGIN));
    }

    #[test]
    fn should_redact_debug_output() {
        let token = CachedToken::new("secret-token", 42);
        let debug_str = format!("{token:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret-token"));
    }

    #[tokio::test]
    async fn should_cache_token() {
        let cache = TokenCache::new();
        assert!(cache.get_fresh(0, MARGIN).await.is_none());

        cache.set(CachedToken::new("cached-token", 3_600_000)).await;

        let cached = cache.get_fresh(0, MARGIN).await.expect("Token should be cached");
        assert_eq!(cached.access_token(), "cached-token");
    }

    #[tokio::test]
    async fn should_not_return_stale_token() {
        let cache = TokenCache::new();
        cache.set(CachedToken::new("stale", 31_000)).await;

        assert!(cache.get_fresh(1_000, MARGIN).await.is_none());
    }

    #[tokio::test]
    async fn should_clear_cache() {
        let cache = TokenCache::new();
        cache.set(CachedToken::new("token", u64::MAX)).await;
        assert!(cache.get_fresh(0, MARGIN).await.is_some());

        cache.clear().await;
        assert!(cache.get_fresh(0, MARGIN).await.is_none());
    }
}
