use std::time::{Duration, Instant};

use headers::{ContentType, HeaderMapExt};
use http::{HeaderMap, StatusCode};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiClientError, TransportError};

/// Body of an API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON payload.
    Json(Value),
    /// Any other payload, or JSON that failed to parse.
    Text(String),
    /// No payload.
    Empty,
}

/// Uniform envelope of an API call.
///
/// Non-2xx statuses are not errors: a 422 business validation answer comes
/// back as an `ApiResult` with [`is_ok`](Self::is_ok) returning `false`.
#[derive(Debug, Clone)]
pub struct ApiResult {
    status: StatusCode,
    headers: IndexMap<String, String>,
    body: ResponseBody,
    elapsed: Duration,
    injected: Vec<String>,
}

impl ApiResult {
    /// Creates a result, mostly useful to test code consuming results.
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body,
            elapsed: Duration::ZERO,
            injected: vec![],
        }
    }

    /// Adds a response header; names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub(crate) async fn from_response(
        response: reqwest::Response,
        endpoint: &str,
        started: Instant,
        injected: Vec<String>,
    ) -> Result<Self, ApiClientError> {
        let status = response.status();
        let is_json = response
            .headers()
            .typed_get::<ContentType>()
            .is_some_and(|content_type| {
                mime::Mime::from(content_type).essence_str() == mime::APPLICATION_JSON.essence_str()
            });
        let headers = collect_headers(endpoint, response.headers());

        let text = response
            .text()
            .await
            .map_err(|err| TransportError::from_reqwest(endpoint, &err))?;
        let body = parse_body(endpoint, is_json, text);
        let elapsed = started.elapsed();
        debug!(%endpoint, %status, ?elapsed, "response received");

        Ok(Self {
            status,
            headers,
            body,
            elapsed,
            injected,
        })
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers with lowercase names.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Looks a header up, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Response body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// The JSON payload, if any.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text payload, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Deserializes the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::JsonValueError`] if the body is not JSON or
    /// does not match `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, ApiClientError> {
        let value = match &self.body {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => serde_json::from_str(text)?,
            ResponseBody::Empty => Value::Null,
        };
        let result = serde_json::from_value(value)?;
        Ok(result)
    }

    /// Time between sending the request and reading the whole body.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Names of the parameters filled from configuration.
    pub fn injected(&self) -> &[String] {
        &self.injected
    }
}

fn parse_body(endpoint: &str, is_json: bool, text: String) -> ResponseBody {
    if text.trim().is_empty() {
        return ResponseBody::Empty;
    }
    if !is_json {
        return ResponseBody::Text(text);
    }
    match serde_json::from_str(&text) {
        Ok(value) => ResponseBody::Json(value),
        Err(error) => {
            warn!(%endpoint, %error, "JSON response could not be parsed, keeping text");
            ResponseBody::Text(text)
        }
    }
}

/// Flattens response headers; repeated values are joined with `, `.
fn collect_headers(endpoint: &str, headers: &HeaderMap) -> IndexMap<String, String> {
    let mut result = IndexMap::<String, String>::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            debug!(%endpoint, header = %name, "skipping non UTF-8 response header");
            continue;
        };
        result
            .entry(name.as_str().to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn should_parse_json_body() {
        let body = parse_body("GET /event/query", true, String::from(r#"[{"eventId": 1}]"#));

        assert_eq!(body, ResponseBody::Json(json!([{"eventId": 1}])));
    }

    #[test]
    fn should_fall_back_to_text_on_invalid_json() {
        let body = parse_body("GET /event/query", true, String::from("<html>oops</html>"));

        assert_eq!(body, ResponseBody::Text(String::from("<html>oops</html>")));
    }

    #[test]
    fn should_keep_text_for_other_content_types() {
        let body = parse_body("GET /Timezone/Query", false, String::from(r#"{"a": 1}"#));

        assert_eq!(body, ResponseBody::Text(String::from(r#"{"a": 1}"#)));
    }

    #[test]
    fn should_join_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("x-warning", HeaderValue::from_static("slow"));
        headers.append("x-warning", HeaderValue::from_static("deprecated"));
        headers.append(
            "x-binary",
            HeaderValue::from_bytes(b"caf\xe9").expect("opaque header value"),
        );
        headers.append("content-type", HeaderValue::from_static("application/json"));

        let collected = collect_headers("GET /event/query", &headers);

        assert_eq!(collected.get("x-warning").map(String::as_str), Some("slow, deprecated"));
        assert_eq!(collected.get("content-type").map(String::as_str), Some("application/json"));
        assert!(!collected.contains_key("x-binary"));
    }

    #[test]
    fn should_detect_empty_body() {
        assert_eq!(parse_body("DELETE /event/close", true, String::new()), ResponseBody::Empty);
        assert_eq!(parse_body("DELETE /event/close", false, String::from("  ")), ResponseBody::Empty);
    }

    #[test]
    fn should_report_non_success_without_error() {
        let result = ApiResult::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ResponseBody::Json(json!({"message": "No events found"})),
        )
        .with_header("Content-Type", "application/json");

        assert!(!result.is_ok());
        assert_eq!(result.status().as_u16(), 422);
        assert_eq!(result.header("content-type"), Some("application/json"));
        assert_eq!(result.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn should_deserialize_json_payload() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Event {
            event_id: u32,
        }

        let result = ApiResult::new(StatusCode::OK, ResponseBody::Json(json!([{"eventId": 7}])));

        let events = result.json_as::<Vec<Event>>().expect("valid events");
        assert_eq!(events, vec![Event { event_id: 7 }]);
        assert!(result.json_as::<String>().is_err());
    }
}
