//! OAuth2-specific error types.

use std::fmt;

/// Errors returned by the token endpoint exchange.
///
/// Network failures are not represented here: they surface as
/// [`TransportError`](crate::TransportError).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint answered with a non-2xx status.
    Rejected {
        /// HTTP status code of the token response.
        status: u16,
        /// Raw response body, usually an OAuth2 error document.
        body: String,
    },

    /// The token endpoint answered 2xx with an unusable payload.
    InvalidTokenResponse {
        /// Description of what was invalid.
        reason: String,
    },
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, body } => {
                write!(f, "Token request rejected with status {status}: {body}")
            }
            Self::InvalidTokenResponse { reason } => {
                write!(f, "Invalid OAuth2 token response: {reason}")
            }
        }
    }
}
