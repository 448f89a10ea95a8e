/// Errors raised while loading the client configuration.
///
/// All of them are reported before any network call is made.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ConfigError {
    /// One or more required fields are absent or blank.
    #[display("missing required configuration: {}", fields.join(", "))]
    #[from(skip)]
    Missing {
        /// Canonical names of every missing field.
        fields: Vec<&'static str>,
    },

    /// A URL field could not be parsed as an absolute URL.
    #[display("invalid URL for '{field}' ({value}): {reason}")]
    #[from(skip)]
    InvalidUrl {
        /// Canonical name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A non-URL field has a value of the wrong shape.
    #[display("invalid value for '{field}': {value}")]
    #[from(skip)]
    InvalidValue {
        /// Canonical name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The source document is not in a supported layout.
    #[display("unsupported configuration format: {message}")]
    #[from(skip)]
    InvalidFormat {
        /// What was wrong with the document.
        message: String,
    },

    /// The source document is not valid JSON.
    #[display("invalid JSON configuration: {_0}")]
    Json(serde_json::Error),

    /// The configuration file could not be read.
    #[display("cannot read configuration file '{path}': {error}")]
    #[from(skip)]
    Io {
        /// File path.
        path: String,
        /// Underlying I/O failure.
        error: std::io::Error,
    },
}
