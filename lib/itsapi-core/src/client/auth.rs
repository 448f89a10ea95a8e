use std::fmt;

use headers::authorization::{Authorization, Bearer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A client secret or access token.
///
/// The buffer is wiped on drop. `Debug` prints `[REDACTED]` and `Display`
/// keeps at most the first and last four characters, so credentials can
/// travel through `tracing` fields without leaking.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a secret.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The raw secret, for the token exchange and the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the wrapped value is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Compares with a plain string without exposing the secret.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }

    fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count <= 8 {
            return String::from("***");
        }
        let head = self.0.chars().take(4).collect::<String>();
        let tail = self.0.chars().skip(count - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecureString").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A bearer access token ready to be attached to an API request.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(SecureString);

impl BearerToken {
    /// Wraps a raw access token.
    pub fn new(value: impl Into<SecureString>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Builds the typed `Authorization: Bearer <token>` header.
    ///
    /// Returns `None` when the token contains characters that are not valid
    /// in a header value.
    pub fn to_authorization(&self) -> Option<Authorization<Bearer>> {
        Authorization::bearer(self.as_str()).ok()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_mask_short_secret() {
        let secret = SecureString::from("abc");
        assert_eq!(secret.to_string(), "***");
    }

    #[test]
    fn should_mask_long_secret() {
        let secret = SecureString::from("super-secret-value");
        assert_eq!(secret.to_string(), "supe...alue");
    }

    #[test]
    fn should_redact_debug_output() {
        let secret = SecureString::from("super-secret-value");
        let debug = format!("{secret:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-value"));

        let token = BearerToken::new("tok-1234567890");
        let debug = format!("{token:?}");
        assert!(!debug.contains("tok-1234567890"));
    }

    #[test]
    fn should_detect_blank_secret() {
        assert!(SecureString::from("   ").is_blank());
        assert!(!SecureString::from("x").is_blank());
    }

    #[test]
    fn should_build_authorization_header() {
        let token = BearerToken::new("tok1");
        let header = token.to_authorization().expect("valid bearer token");
        assert_eq!(header.token(), "tok1");
    }

    #[test]
    fn should_reject_invalid_header_characters() {
        let token = BearerToken::new("bad\ntoken");
        assert!(token.to_authorization().is_none());
    }
}
