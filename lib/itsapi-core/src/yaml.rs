//! YAML support using serde-saphyr.
//!
//! Used to load YAML configuration files and to render the catalogue's
//! OpenAPI document. Only available with the `yaml` feature.
//!
//! # Example
//!
//! ```rust
//! use itsapi_core::{Catalog, ToYaml};
//!
//! let yaml = Catalog::bundled().to_openapi().to_yaml().unwrap();
//! assert!(yaml.contains("/Form/Query:"));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for YAML serialization.
pub type YamlError = serde_saphyr::ser_error::Error;

/// Error type for YAML parsing.
pub type YamlParseError = serde_saphyr::Error;

/// Extension trait for serializing types to YAML.
pub trait ToYaml: Serialize + Sized {
    /// Serializes this value to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`YamlError`] if serialization fails.
    fn to_yaml(&self) -> Result<String, YamlError> {
        serde_saphyr::to_string(self)
    }
}

impl<T: Serialize + Sized> ToYaml for T {}

/// Parses a YAML document.
///
/// # Errors
///
/// Returns a [`YamlParseError`] if the text is not valid YAML for `T`.
pub fn from_yaml<T: DeserializeOwned>(text: &str) -> Result<T, YamlParseError> {
    serde_saphyr::from_str(text)
}
