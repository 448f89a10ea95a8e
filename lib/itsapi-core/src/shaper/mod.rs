//! Business-level annotation of API results.
//!
//! [`shape`] is pure: it reads an [`ApiResult`] and the catalogue, and never
//! changes the result.

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::catalog::{Catalog, Operation};
use crate::client::{ApiResult, ResponseBody};

/// A hypermedia suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// `self`, or the name of a related operation.
    pub rel: String,
    /// Path of the target, relative to the base URL.
    pub href: String,
    /// HTTP method of the target.
    pub method: String,
}

/// Human oriented reading of an [`ApiResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseAnnotation {
    /// One line summary, e.g. `Found 12 events`.
    pub interpretation: String,
    /// What the domain is about and what the status means for it.
    pub business_context: String,
    /// Plausible causes of a non-2xx status; empty on success.
    pub causes: Vec<String>,
    /// `self` plus the other operations of the same domain.
    pub links: Vec<Link>,
}

/// Annotates the result of `operation`.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use itsapi_core::{ApiResult, ResponseBody, shape};
/// use serde_json::json;
///
/// let result = ApiResult::new(
///     StatusCode::OK,
///     ResponseBody::Json(json!([{"eventId": 1}, {"eventId": 2}])),
/// );
///
/// let annotation = shape("eventQuery", &result);
/// assert_eq!(annotation.interpretation, "Found 2 events");
/// assert_eq!(annotation.links[0].rel, "self");
/// ```
pub fn shape(operation: &str, result: &ApiResult) -> ResponseAnnotation {
    let found = Catalog::bundled().get(operation);
    let status = result.status();

    ResponseAnnotation {
        interpretation: interpret(found, result),
        business_context: business_context(operation, found, status),
        causes: causes(status),
        links: found.map(links).unwrap_or_default(),
    }
}

fn interpret(operation: Option<&Operation>, result: &ApiResult) -> String {
    let status = result.status();
    if status.is_success() {
        return match result.body() {
            ResponseBody::Empty => String::from("No content returned"),
            ResponseBody::Json(value) => match (record_count(value), operation) {
                (Some(count), Some(operation)) => {
                    format!("Found {count} {}", operation.domain().noun())
                }
                (Some(count), None) => format!("Found {count} records"),
                (None, _) => String::from("Request successful - data retrieved"),
            },
            ResponseBody::Text(_) => String::from("Request successful - data retrieved"),
        };
    }

    match status.as_u16() {
        400 => String::from("Bad request - check parameter format and required fields"),
        401 => String::from("Authentication failed - check API credentials and token validity"),
        403 => String::from("Access denied - may be expected behavior given test context"),
        404 => String::from("Endpoint or resource not found"),
        422 => String::from(
            "Business validation response - this may be expected when no data matches the query criteria",
        ),
        500..=599 => String::from("Server error - may indicate API issue"),
        code => format!("HTTP {code} response - check API documentation"),
    }
}

/// Envelope fields that hold the records of a paged answer.
const ENVELOPE_FIELDS: &[&str] = &["items", "data", "results", "records"];

/// Number of records of a list payload: a top-level array or the array held
/// by a known envelope field. Other objects are single records.
fn record_count(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(fields) => ENVELOPE_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).and_then(Value::as_array))
            .map(Vec::len),
        _ => None,
    }
}

fn business_context(name: &str, operation: Option<&Operation>, status: StatusCode) -> String {
    let Some(operation) = operation else {
        return format!("Educational testing API response from {name}");
    };
    let domain = operation.domain();
    let meaning = match status.as_u16() {
        200..=299 => "",
        401 | 403 => " The client is not allowed to run this operation with the current token.",
        422 => {
            " Status 422 reports a business validation failure, possibly because no records match the query."
        }
        _ => " The operation did not complete.",
    };
    format!("{domain}: {}{meaning}", domain.description())
}

fn causes(status: StatusCode) -> Vec<String> {
    let causes: &[&str] = match status.as_u16() {
        200..=299 => &[],
        400 => &[
            "A parameter has an invalid format",
            "A required field is missing from the request body",
        ],
        401 => &[
            "CLIENT_ID or CLIENT_SECRET is wrong",
            "The OAuth2 token has expired",
            "The credentials are not valid for this environment",
        ],
        403 => &[
            "The client is not authorized for this program or institution",
            "The program-institution-id is outside the client's scope",
        ],
        404 => &[
            "The endpoint path or its casing is wrong",
            "A required parameter is missing",
            "The resource does not exist in the system",
        ],
        422 => &[
            "No records match the query",
            "A parameter value is not valid for this program",
            "The endpoint requires specific institution access",
        ],
        500..=599 => &[
            "The API server encountered an internal error",
            "The API server is unavailable or overloaded",
        ],
        _ => &[
            "Network connectivity problem",
            "API server status",
            "Request parameters or format",
        ],
    };
    causes.iter().map(ToString::to_string).collect()
}

fn links(operation: &Operation) -> Vec<Link> {
    let link = |rel: &str, related: &Operation| Link {
        rel: rel.to_string(),
        href: related.path().to_string(),
        method: related.method().to_string(),
    };

    let related = Catalog::bundled()
        .by_domain(operation.domain())
        .filter(|related| related.name() != operation.name())
        .map(|related| link(related.name(), related));

    std::iter::once(link("self", operation))
        .chain(related)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn result(status: u16, body: ResponseBody) -> ApiResult {
        let status = StatusCode::from_u16(status).expect("valid status");
        ApiResult::new(status, body)
    }

    #[rstest]
    #[case::list(ResponseBody::Json(json!([1, 2, 3])), "Found 3 events")]
    #[case::envelope(ResponseBody::Json(json!({"total": 2, "items": [1, 2]})), "Found 2 events")]
    #[case::record_with_list_field(
        ResponseBody::Json(json!({"eventId": 7, "formIds": ["A", "B", "C"]})),
        "Request successful - data retrieved"
    )]
    #[case::object(ResponseBody::Json(json!({"eventId": 1})), "Request successful - data retrieved")]
    #[case::text(ResponseBody::Text(String::from("ok")), "Request successful - data retrieved")]
    #[case::empty(ResponseBody::Empty, "No content returned")]
    fn should_interpret_success(#[case] body: ResponseBody, #[case] expected: &str) {
        let annotation = shape("eventQuery", &result(200, body));

        assert_eq!(annotation.interpretation, expected);
        assert!(annotation.causes.is_empty());
    }

    #[rstest]
    #[case(401, "Authentication failed - check API credentials and token validity")]
    #[case(403, "Access denied - may be expected behavior given test context")]
    #[case(404, "Endpoint or resource not found")]
    #[case(503, "Server error - may indicate API issue")]
    #[case(418, "HTTP 418 response - check API documentation")]
    fn should_interpret_failures(#[case] status: u16, #[case] expected: &str) {
        let annotation = shape("eventQuery", &result(status, ResponseBody::Empty));

        assert_eq!(annotation.interpretation, expected);
        assert!(!annotation.causes.is_empty());
    }

    #[test]
    fn should_explain_business_validation() {
        let annotation = shape(
            "eventClassQuery",
            &result(422, ResponseBody::Json(json!({"message": "No classes"}))),
        );

        assert_eq!(
            annotation.interpretation,
            "Business validation response - this may be expected when no data matches the query criteria"
        );
        assert!(annotation.business_context.starts_with("Event Class: Class sessions"));
        assert!(annotation.business_context.contains("no records match"));
        insta::assert_debug_snapshot!(annotation.causes, @r#"
        [
            "No records match the query",
            "A parameter value is not valid for this program",
            "The endpoint requires specific institution access",
        ]
        "#);
    }

    #[test]
    fn should_link_self_and_same_domain_operations() {
        let annotation = shape("sessionQuery", &result(200, ResponseBody::Json(json!([]))));

        let rels = annotation
            .links
            .iter()
            .map(|link| link.rel.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            rels,
            vec!["self", "sessionCreate", "sessionUpdate", "sessionDelete"]
        );
        assert_eq!(
            annotation.links.first(),
            Some(&Link {
                rel: String::from("self"),
                href: String::from("/session/query"),
                method: String::from("GET"),
            })
        );
    }

    #[test]
    fn should_not_count_list_fields_of_single_record() {
        let body = json!({"eventClassId": 7, "examineeIds": ["A", "B", "C"]});

        let annotation = shape("eventClassQuery", &result(200, ResponseBody::Json(body)));

        assert_eq!(annotation.interpretation, "Request successful - data retrieved");
    }

    #[test]
    fn should_shape_unknown_operation() {
        let annotation = shape("customCall", &result(200, ResponseBody::Json(json!([1]))));

        assert_eq!(annotation.interpretation, "Found 1 records");
        assert_eq!(
            annotation.business_context,
            "Educational testing API response from customCall"
        );
        assert!(annotation.links.is_empty());
    }

    #[test]
    fn should_leave_result_untouched() {
        let original = result(422, ResponseBody::Json(json!({"message": "No events"})));
        let copy = original.clone();

        let _annotation = shape("eventQuery", &original);

        assert_eq!(original.status(), copy.status());
        assert_eq!(original.body(), copy.body());
    }
}
