/// Which constraint a [`ValidationError`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ValidationErrorKind {
    /// The operation name is not in the catalogue.
    #[display("unknown operation")]
    UnknownOperation,
    /// A required parameter is absent or blank.
    #[display("missing required parameter")]
    MissingRequired,
    /// An exactly-one-of group has zero or several members present.
    #[display("conditional group")]
    ConditionalGroup,
    /// Neither the single parameter nor the full alternative set is present.
    #[display("alternative parameters")]
    Alternative,
    /// Two parameters that exclude each other are both present.
    #[display("mutually exclusive parameters")]
    MutuallyExclusive,
    /// A parameter is present without its companion.
    #[display("co-required parameters")]
    CoRequired,
    /// A parameter is required because another one has a given value.
    #[display("value condition")]
    ValueCondition,
    /// The request body is missing or has the wrong shape.
    #[display("request body")]
    Body,
}

/// A parameter constraint violation, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{message}")]
pub struct ValidationError {
    /// Violated constraint.
    pub kind: ValidationErrorKind,
    /// Operation name, e.g. `eventQuery`.
    pub operation: String,
    /// `METHOD path` of the operation, when known.
    pub endpoint: Option<String>,
    /// Offending parameter, when a single one is to blame.
    pub parameter: Option<String>,
    /// Human readable message.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation: operation.into(),
            endpoint: None,
            parameter: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub(crate) fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    #[must_use]
    pub(crate) fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub(crate) fn unknown_operation(operation: &str) -> Self {
        Self::new(
            ValidationErrorKind::UnknownOperation,
            operation,
            format!("unknown operation: {operation}"),
        )
    }
}
