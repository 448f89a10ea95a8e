use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::ParamValue;
use crate::client::ApiClientError;

/// Ordered query parameters of a request.
///
/// Keys keep their insertion order, which is also the order of the
/// serialized query string.
///
/// # Example
///
/// ```rust
/// use itsapi_core::{ParamValue, RequestParameters};
///
/// let params = RequestParameters::new()
///     .add_param("program-id", "238")
///     .add_param("form-id", ParamValue::list(["F1", "F2"]))
///     .add_param("limit", 20);
///
/// assert_eq!(
///     params.to_query_string().unwrap(),
///     "program-id=238&form-id=F1&form-id=F2&limit=20"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters {
    params: IndexMap<String, ParamValue>,
}

impl RequestParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value with the same name.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Removes a parameter, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.params.shift_remove(name)
    }

    /// Returns the raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns `true` when the parameter exists and [is present](ParamValue::is_present).
    pub fn is_present(&self, name: &str) -> bool {
        self.params.get(name).is_some_and(ParamValue::is_present)
    }

    /// Renders a present scalar parameter.
    pub fn scalar(&self, name: &str) -> Option<String> {
        self.params
            .get(name)
            .filter(|value| value.is_present())
            .and_then(ParamValue::as_scalar)
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of parameters, `Null` ones included.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when no parameter was set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Builds the parameters from a serializable record.
    ///
    /// The record must serialize to a flat object whose values are scalars or
    /// lists of scalars.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedParameterValue`] for nested values.
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> Result<Self, ApiClientError> {
        let value = serde_json::to_value(record)?;
        let Value::Object(map) = value else {
            return Err(ApiClientError::UnsupportedParameterValue {
                name: String::from("<root>"),
                value,
            });
        };

        let mut result = Self::new();
        for (name, value) in map {
            let Some(param) = ParamValue::from_json(&value) else {
                return Err(ApiClientError::UnsupportedParameterValue { name, value });
            };
            result.insert(name, param);
        }
        Ok(result)
    }

    /// Flattens the parameters to query pairs.
    ///
    /// `Null` values are omitted and lists follow their [`ParamStyle`](super::ParamStyle).
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .flat_map(|(name, value)| {
                value
                    .to_query_values()
                    .into_iter()
                    .map(move |item| (name.clone(), item))
            })
            .collect()
    }

    /// Percent-encodes the parameters as a query string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::QuerySerializationError`] if encoding fails.
    pub fn to_query_string(&self) -> Result<String, ApiClientError> {
        let query = serde_urlencoded::to_string(self.to_query_pairs())?;
        Ok(query)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (name, value) in iter {
            result.insert(name, value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ParamStyle;

    #[test]
    fn should_keep_insertion_order() {
        let params = RequestParameters::new()
            .add_param("program-id", "238")
            .add_param("event-id", "E1")
            .add_param("limit", 10);

        let names = params.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, vec!["program-id", "event-id", "limit"]);
    }

    #[test]
    fn should_omit_null_values_from_query() {
        let params = RequestParameters::new()
            .add_param("program-id", "238")
            .add_param("event-id", ParamValue::Null)
            .add_param("active-only", true);

        assert_eq!(
            params.to_query_string().expect("valid query"),
            "program-id=238&active-only=true"
        );
    }

    #[test]
    fn should_percent_encode_values() {
        let params = RequestParameters::new()
            .add_param("event-description", "Spring 2024 & more")
            .add_param(
                "ip-address",
                ParamValue::list(["10.0.0.1", "10.0.0.2"]).with_style(ParamStyle::SpaceDelimited),
            );

        assert_eq!(
            params.to_query_string().expect("valid query"),
            "event-description=Spring+2024+%26+more&ip-address=10.0.0.1+10.0.0.2"
        );
    }

    #[test]
    fn should_round_trip_query_pairs() {
        let params = RequestParameters::new()
            .add_param("program-id", "238")
            .add_param("form-id", ParamValue::list(["F 1", "F/2"]))
            .add_param("session-code", "a=b&c")
            .add_param("limit", 5);

        let query = params.to_query_string().expect("valid query");
        let mut parsed =
            serde_urlencoded::from_str::<Vec<(String, String)>>(&query).expect("valid pairs");
        let mut expected = params.to_query_pairs();
        parsed.sort();
        expected.sort();

        assert_eq!(parsed, expected);
    }

    #[test]
    fn should_build_from_serializable_record() {
        #[derive(Serialize)]
        #[serde(rename_all = "kebab-case")]
        struct Record {
            program_id: &'static str,
            examinee_id: Vec<&'static str>,
            limit: Option<u32>,
        }

        let params = RequestParameters::from_serialize(&Record {
            program_id: "238",
            examinee_id: vec!["X1", "X2"],
            limit: None,
        })
        .expect("valid record");

        assert_eq!(params.get("program-id"), Some(&ParamValue::from("238")));
        assert_eq!(params.get("examinee-id"), Some(&ParamValue::list(["X1", "X2"])));
        assert_eq!(params.get("limit"), Some(&ParamValue::Null));
    }

    #[test]
    fn should_reject_nested_values() {
        let result = RequestParameters::from_serialize(&serde_json::json!({"filter": {"a": 1}}));
        assert!(matches!(
            result,
            Err(ApiClientError::UnsupportedParameterValue { name, .. }) if name == "filter"
        ));
    }
}
