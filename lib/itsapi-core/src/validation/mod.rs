//! Parameter validation against the bundled rule table.
//!
//! Validation is pure and synchronous: it runs before any token request or
//! API call, so a [`ValidationError`] guarantees nothing was sent.

use serde_json::Value;

use crate::catalog::Catalog;
use crate::client::RequestParameters;

mod error;
mod rule;

pub use self::error::{ValidationError, ValidationErrorKind};
pub use self::rule::{Alternative, BodyRule, ParameterRule, UNIVERSAL_PARAMETERS, ValueCondition};

/// Validates the query parameters of a named operation.
///
/// # Errors
///
/// Returns the first violated constraint, or
/// [`ValidationErrorKind::UnknownOperation`] when `operation` is not in the
/// catalogue.
///
/// # Example
///
/// ```rust
/// use itsapi_core::{RequestParameters, validate};
///
/// let params = RequestParameters::new()
///     .add_param("program-id", "238")
///     .add_param("before-id", "10")
///     .add_param("after-id", "20");
///
/// let error = validate("eventQuery", &params).unwrap_err();
/// assert_eq!(error.to_string(), "before-id and after-id cannot be used together");
/// ```
pub fn validate(operation: &str, params: &RequestParameters) -> Result<(), ValidationError> {
    let Some(found) = Catalog::bundled().get(operation) else {
        return Err(ValidationError::unknown_operation(operation));
    };
    found
        .rule()
        .check(found.name(), params)
        .map_err(|error| error.with_endpoint(found.endpoint()))
}

/// Validates the JSON body of a named operation.
///
/// # Errors
///
/// Returns a [`ValidationErrorKind::Body`] error when the body is missing or
/// has the wrong shape, or [`ValidationErrorKind::UnknownOperation`].
pub fn validate_body(operation: &str, body: Option<&Value>) -> Result<(), ValidationError> {
    let Some(found) = Catalog::bundled().get(operation) else {
        return Err(ValidationError::unknown_operation(operation));
    };
    found
        .rule()
        .check_body(found.name(), body)
        .map_err(|error| error.with_endpoint(found.endpoint()))
}
