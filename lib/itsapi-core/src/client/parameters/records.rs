use serde::Serialize;

use super::RequestParameters;
use crate::client::ApiClientError;

/// A typed parameter record bound to one catalogue operation.
///
/// Records serialize with kebab-case names; absent options and empty lists
/// are skipped so they never reach the query string.
///
/// # Example
///
/// ```rust
/// use itsapi_core::{EventQuery, OperationParams};
///
/// let query = EventQuery {
///     program_id: String::from("238"),
///     active_only: Some(true),
///     limit: Some(5),
///     ..EventQuery::default()
/// };
///
/// let params = query.to_parameters().unwrap();
/// assert_eq!(
///     params.to_query_string().unwrap(),
///     "program-id=238&active-only=true&limit=5"
/// );
/// ```
pub trait OperationParams: Serialize {
    /// Catalogue name of the operation, e.g. `eventQuery`.
    const OPERATION: &'static str;

    /// Converts the record to request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedParameterValue`] for nested values.
    fn to_parameters(&self) -> Result<RequestParameters, ApiClientError> {
        RequestParameters::from_serialize(self)
    }
}

/// `GET /event/query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_institution_id: Option<String>,
    /// Event identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event description, matched exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    /// Only events that are still open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_only: Option<bool>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page backwards from this id; excludes `after_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    /// Page forwards from this id; excludes `before_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
}

impl OperationParams for EventQuery {
    const OPERATION: &'static str = "eventQuery";
}

/// `GET /event/authorizations/Query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventAuthorizationQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    pub program_institution_id: String,
    /// Event identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event description, matched exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page backwards from this id; excludes `after_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    /// Page forwards from this id; excludes `before_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
}

impl OperationParams for EventAuthorizationQuery {
    const OPERATION: &'static str = "eventAuthorizationQuery";
}

/// `GET /event-class/Query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventClassQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    pub program_institution_id: String,
    /// Event identifier.
    pub event_id: String,
    /// Class session identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_class_id: Option<String>,
    /// Program specific class code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_class_code: Option<String>,
}

impl OperationParams for EventClassQuery {
    const OPERATION: &'static str = "eventClassQuery";
}

/// `GET /remote/sessions/query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteSessionQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Session code; alternative to the UTC range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_code: Option<String>,
    /// Start of the UTC range; requires `end_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_utc: Option<String>,
    /// End of the UTC range; requires `start_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_utc: Option<String>,
}

impl OperationParams for RemoteSessionQuery {
    const OPERATION: &'static str = "remoteSessionQuery";
}

/// `GET /session/query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_institution_id: Option<String>,
    /// Session code; alternative to the UTC range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_code: Option<String>,
    /// Start of the UTC range; requires `end_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_utc: Option<String>,
    /// End of the UTC range; requires `start_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_utc: Option<String>,
}

impl OperationParams for SessionQuery {
    const OPERATION: &'static str = "sessionQuery";
}

/// `GET /Form/Query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FormQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_institution_id: Option<String>,
    /// Forms to return.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub form_id: Vec<String>,
    /// Only forms modified since this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_utc: Option<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page backwards from this id; excludes `after_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    /// Page forwards from this id; excludes `before_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
    /// Extra form sections to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_flag: Option<String>,
}

impl OperationParams for FormQuery {
    const OPERATION: &'static str = "formQuery";
}

/// `GET /order/Query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_institution_id: Option<String>,
    /// Order identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_id: Vec<String>,
    /// Order codes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_code: Vec<String>,
    /// Package codes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_code: Vec<String>,
    /// Orders placed after this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_after_utc: Option<String>,
    /// Orders placed before this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_before_utc: Option<String>,
}

impl OperationParams for OrderQuery {
    const OPERATION: &'static str = "orderQuery";
}

/// `GET /registration/query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrationQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Institution within the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_institution_id: Option<String>,
    /// Registration identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registration_id: Vec<String>,
    /// Program side registration identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_registration_id: Vec<String>,
    /// Examinee identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examinee_id: Option<String>,
    /// Public examinee identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_examinee_public_id: Option<String>,
    /// Start of the UTC range; requires `end_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_utc: Option<String>,
    /// End of the UTC range; requires `start_utc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_utc: Option<String>,
    /// Test identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    /// Only completed registrations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page backwards from this id; excludes `after_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    /// Page forwards from this id; excludes `before_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
}

impl OperationParams for RegistrationQuery {
    const OPERATION: &'static str = "registrationQuery";
}

/// `GET /user/access/query`
///
/// Exactly one of `vendor_id` and `sponsor_id` must be set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAccessQuery {
    /// Vendor scope; excludes `sponsor_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Sponsor scope; excludes `vendor_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_id: Option<String>,
    /// Programs to include.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_id: Vec<String>,
    /// Institutions to include.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_institution_id: Vec<String>,
    /// Users to return.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_id: Vec<String>,
    /// Comma separated user types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_user_types: Option<String>,
    /// Comma separated user statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_user_statuses: Option<String>,
}

impl OperationParams for UserAccessQuery {
    const OPERATION: &'static str = "queryUserAccess";
}

/// `GET /longitudinal-group/examinees/query`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LongitudinalGroupExamineesQuery {
    /// Program the query runs in.
    pub program_id: String,
    /// Group identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitudinal_group_id: Option<String>,
    /// Group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitudinal_group_name: Option<String>,
    /// Examinee identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examinee_id: Vec<String>,
    /// System examinee identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_examinee_system_id: Vec<String>,
    /// Public examinee identifier.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_examinee_public_id: Vec<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page backwards from this id; excludes `after_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    /// Page forwards from this id; excludes `before_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
}

impl OperationParams for LongitudinalGroupExamineesQuery {
    const OPERATION: &'static str = "getLongitudinalGroupExamineesQuery";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::client::ParamValue;
    use crate::validation::validate;

    #[test]
    fn should_bind_records_to_catalogue_operations() {
        let catalog = Catalog::bundled();
        for operation in [
            EventQuery::OPERATION,
            EventAuthorizationQuery::OPERATION,
            EventClassQuery::OPERATION,
            RemoteSessionQuery::OPERATION,
            SessionQuery::OPERATION,
            FormQuery::OPERATION,
            OrderQuery::OPERATION,
            RegistrationQuery::OPERATION,
            UserAccessQuery::OPERATION,
            LongitudinalGroupExamineesQuery::OPERATION,
        ] {
            assert!(catalog.get(operation).is_some(), "{operation} not found");
        }
    }

    #[test]
    fn should_skip_absent_fields() {
        let params = FormQuery {
            program_id: String::from("238"),
            form_id: vec![String::from("F1"), String::from("F2")],
            ..FormQuery::default()
        }
        .to_parameters()
        .expect("valid record");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("form-id"), Some(&ParamValue::list(["F1", "F2"])));
        assert_eq!(
            params.to_query_string().expect("valid query"),
            "program-id=238&form-id=F1&form-id=F2"
        );
    }

    #[test]
    fn should_validate_record_parameters() {
        let query = EventAuthorizationQuery {
            program_id: String::from("238"),
            program_institution_id: String::from("inst"),
            event_id: Some(String::from("E1")),
            event_description: Some(String::from("Spring")),
            ..EventAuthorizationQuery::default()
        };
        let params = query.to_parameters().expect("valid record");

        let error = validate(EventAuthorizationQuery::OPERATION, &params).expect_err("should fail");

        assert_eq!(
            error.to_string(),
            "Only one of event-id or event-description should be provided"
        );
    }

    #[test]
    fn should_treat_blank_required_text_as_missing() {
        let params = EventClassQuery {
            program_id: String::from("238"),
            program_institution_id: String::new(),
            event_id: String::from("E1"),
            ..EventClassQuery::default()
        }
        .to_parameters()
        .expect("valid record");

        let error = validate(EventClassQuery::OPERATION, &params).expect_err("should fail");

        assert_eq!(error.to_string(), "program-institution-id is required");
    }
}
