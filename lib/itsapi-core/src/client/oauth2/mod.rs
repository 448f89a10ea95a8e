//! OAuth2 client-credentials token management.
//!
//! The [`TokenManager`] owns the only shared mutable state of the crate: the
//! cached access token. It moves between two states, *empty* and *cached*:
//!
//! - a cached token is reused while `now < expires_at - safety_margin`,
//! - otherwise a form-encoded `grant_type=client_credentials` request is sent
//!   to the token endpoint and the answer replaces the cache,
//! - failures leave the cache untouched.
//!
//! Time is read through the [`Clock`] trait so expiry can be driven by a
//! [`ManualClock`] in tests.

mod clock;
mod error;
mod manager;
mod token;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::error::AuthError;
pub use self::manager::{DEFAULT_SAFETY_MARGIN, TokenManager, TokenManagerBuilder};
pub(crate) use self::manager::http_client;
pub use self::token::CachedToken;
