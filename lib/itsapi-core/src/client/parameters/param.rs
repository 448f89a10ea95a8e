use std::fmt::{self, Display};

use serde_json::Value;
use utoipa::openapi::path::ParameterStyle;

/// How list values are laid out in the query string.
///
/// # Examples
///
/// ```rust
/// use itsapi_core::{ParamStyle, ParamValue, RequestParameters};
///
/// // Form style (default) - repeated keys: ?form-id=A&form-id=B
/// let form = ParamValue::list(["A", "B"]);
///
/// // Simple style - comma joined: ?form-id=A,B
/// let comma = ParamValue::list(["A", "B"]).with_style(ParamStyle::Simple);
///
/// // Pipe delimited: ?form-id=A|B
/// let pipe = ParamValue::list(["A", "B"]).with_style(ParamStyle::PipeDelimited);
///
/// let params = RequestParameters::new().add_param("form-id", pipe);
/// assert_eq!(params.to_query_string().unwrap(), "form-id=A%7CB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// Form style: `param=value1&param=value2`
    #[default]
    Form,
    /// Simple style: `param=value1,value2`
    Simple,
    /// Space delimited: `param=value1 value2`
    SpaceDelimited,
    /// Pipe delimited: `param=value1|value2`
    PipeDelimited,
}

impl ParamStyle {
    fn delimiter(self) -> Option<&'static str> {
        match self {
            Self::Form => None,
            Self::Simple => Some(","),
            Self::SpaceDelimited => Some(" "),
            Self::PipeDelimited => Some("|"),
        }
    }
}

impl From<ParamStyle> for ParameterStyle {
    fn from(value: ParamStyle) -> Self {
        match value {
            ParamStyle::Form => Self::Form,
            ParamStyle::Simple => Self::Simple,
            ParamStyle::SpaceDelimited => Self::SpaceDelimited,
            ParamStyle::PipeDelimited => Self::PipeDelimited,
        }
    }
}

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// Flag.
    Boolean(bool),
    /// Several scalar values rendered with a [`ParamStyle`].
    List {
        /// Rendered items.
        items: Vec<String>,
        /// Query layout.
        style: ParamStyle,
    },
    /// Explicitly absent; never serialized.
    Null,
}

impl ParamValue {
    /// Creates a form-style list.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        Self::List {
            items: items.into_iter().map(|item| item.to_string()).collect(),
            style: ParamStyle::Form,
        }
    }

    /// Changes the style of a list; scalars are returned unchanged.
    #[must_use]
    pub fn with_style(self, style: ParamStyle) -> Self {
        match self {
            Self::List { items, .. } => Self::List { items, style },
            other => other,
        }
    }

    /// A value is present when it is not `Null`, not blank text and not an empty list.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(text) => !text.trim().is_empty(),
            Self::List { items, .. } => items.iter().any(|item| !item.trim().is_empty()),
            Self::Integer(_) | Self::Number(_) | Self::Boolean(_) => true,
        }
    }

    /// Renders a scalar value; lists and `Null` return `None`.
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Number(value) => Some(value.to_string()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::List { .. } | Self::Null => None,
        }
    }

    /// Query values for this parameter: one per repeated key.
    pub(crate) fn to_query_values(&self) -> Vec<String> {
        match self {
            Self::Null => vec![],
            Self::List { items, style } => match style.delimiter() {
                None => items.clone(),
                Some(_) if items.is_empty() => vec![],
                Some(delimiter) => vec![items.join(delimiter)],
            },
            scalar => scalar.as_scalar().into_iter().collect(),
        }
    }

    /// Converts a JSON value; objects and nested arrays are rejected.
    pub(crate) fn from_json(value: &Value) -> Option<Self> {
        let result = match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Boolean(*flag),
            Value::String(text) => Self::Text(text.clone()),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Integer(int),
                None => Self::Number(number.as_f64()?),
            },
            Value::Array(values) => {
                let items = values
                    .iter()
                    .map(|item| match item {
                        Value::Array(_) | Value::Object(_) => None,
                        scalar => Self::from_json(scalar)?.as_scalar(),
                    })
                    .collect::<Option<Vec<_>>>()?;
                Self::List {
                    items,
                    style: ParamStyle::Form,
                }
            }
            Value::Object(_) => return None,
        };
        Some(result)
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List { items, style } => {
                write!(f, "{}", items.join(style.delimiter().unwrap_or(",")))
            }
            Self::Null => write!(f, "null"),
            scalar => write!(f, "{}", scalar.as_scalar().unwrap_or_default()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Display> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        Self::list(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
