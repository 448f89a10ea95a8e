use serde_json::Value;

use super::error::{ValidationError, ValidationErrorKind};
use crate::client::RequestParameters;

/// Parameters checked before every other required parameter.
pub const UNIVERSAL_PARAMETERS: &[&str] = &["program-id"];

/// Either `single` or every parameter of `all_of` must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    /// The parameter that satisfies the rule on its own.
    pub single: &'static str,
    /// The set that satisfies the rule together.
    pub all_of: Vec<&'static str>,
}

/// `parameter` is required when `when` equals `equals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCondition {
    /// Parameter that becomes required.
    pub parameter: &'static str,
    /// Parameter whose value is inspected.
    pub when: &'static str,
    /// Triggering value.
    pub equals: &'static str,
}

/// Constraint on the JSON request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyRule {
    /// No body is expected; one is sent if given.
    #[default]
    Optional,
    /// A body must be given.
    Required,
    /// A non-empty JSON array must be given.
    NonEmptyArray,
}

/// Declarative parameter constraints of one operation.
///
/// Rules are static data: an operation gets new constraints by adding
/// entries, never new code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterRule {
    /// Required parameters, universal ones included.
    pub required: Vec<&'static str>,
    /// Groups where exactly one parameter must be present.
    pub conditional_groups: Vec<Vec<&'static str>>,
    /// Single-or-set alternatives.
    pub alternatives: Vec<Alternative>,
    /// Pairs that cannot be used together.
    pub mutually_exclusive: Vec<(&'static str, &'static str)>,
    /// Pairs where each parameter requires the other.
    pub co_required: Vec<(&'static str, &'static str)>,
    /// Value-dependent requirements.
    pub required_when: Vec<ValueCondition>,
    /// Body constraint.
    pub body: BodyRule,
}

impl ParameterRule {
    /// Checks `params` against the rule; the first violation wins.
    ///
    /// The order is fixed: universal required parameters, other required
    /// parameters, conditional groups, alternatives, mutual exclusions,
    /// co-required pairs, then value conditions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn check(&self, operation: &str, params: &RequestParameters) -> Result<(), ValidationError> {
        let universal = self
            .required
            .iter()
            .filter(|name| UNIVERSAL_PARAMETERS.contains(name));
        let domain = self
            .required
            .iter()
            .filter(|name| !UNIVERSAL_PARAMETERS.contains(name));
        for name in universal.chain(domain) {
            if !params.is_present(name) {
                return Err(ValidationError::new(
                    ValidationErrorKind::MissingRequired,
                    operation,
                    format!("{name} is required"),
                )
                .with_parameter(*name));
            }
        }

        for group in &self.conditional_groups {
            let present = group.iter().filter(|name| params.is_present(name)).count();
            if present == 0 {
                return Err(ValidationError::new(
                    ValidationErrorKind::ConditionalGroup,
                    operation,
                    format!("Either {} is required", join_or(group)),
                ));
            }
            if present > 1 {
                return Err(ValidationError::new(
                    ValidationErrorKind::ConditionalGroup,
                    operation,
                    format!("Only one of {} should be provided", join_or(group)),
                ));
            }
        }

        for alternative in &self.alternatives {
            let single = params.is_present(alternative.single);
            let all = alternative.all_of.iter().all(|name| params.is_present(name));
            if !single && !all {
                return Err(ValidationError::new(
                    ValidationErrorKind::Alternative,
                    operation,
                    format!(
                        "Either {} or both {} are required",
                        alternative.single,
                        alternative.all_of.join(" and ")
                    ),
                ));
            }
        }

        for (first, second) in &self.mutually_exclusive {
            if params.is_present(first) && params.is_present(second) {
                return Err(ValidationError::new(
                    ValidationErrorKind::MutuallyExclusive,
                    operation,
                    format!("{first} and {second} cannot be used together"),
                ));
            }
        }

        for (first, second) in &self.co_required {
            for (given, missing) in [(first, second), (second, first)] {
                if params.is_present(given) && !params.is_present(missing) {
                    return Err(ValidationError::new(
                        ValidationErrorKind::CoRequired,
                        operation,
                        format!("{missing} is required when {given} is provided"),
                    )
                    .with_parameter(*missing));
                }
            }
        }

        for condition in &self.required_when {
            let triggered = params
                .scalar(condition.when)
                .is_some_and(|value| value.trim() == condition.equals);
            if triggered && !params.is_present(condition.parameter) {
                return Err(ValidationError::new(
                    ValidationErrorKind::ValueCondition,
                    operation,
                    format!(
                        "{} is required when {} = {}",
                        condition.parameter, condition.when, condition.equals
                    ),
                )
                .with_parameter(condition.parameter));
            }
        }

        Ok(())
    }

    /// Checks the request body against [`BodyRule`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationErrorKind::Body`] error on mismatch.
    pub fn check_body(&self, operation: &str, body: Option<&Value>) -> Result<(), ValidationError> {
        let error = |message: &str| {
            Err(
                ValidationError::new(ValidationErrorKind::Body, operation, message)
                    .with_parameter("body"),
            )
        };
        match (self.body, body) {
            (BodyRule::Required | BodyRule::NonEmptyArray, None | Some(Value::Null)) => {
                error("request body is required")
            }
            (BodyRule::NonEmptyArray, Some(Value::Array(items))) if items.is_empty() => {
                error("request body must contain at least one item")
            }
            (BodyRule::NonEmptyArray, Some(Value::Array(_))) => Ok(()),
            (BodyRule::NonEmptyArray, Some(_)) => error("request body must be a JSON array"),
            _ => Ok(()),
        }
    }
}

/// `a or b`, `a, b or c`.
fn join_or(names: &[&str]) -> String {
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}
