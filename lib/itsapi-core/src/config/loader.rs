use std::path::{Path, PathBuf};
use std::time::Duration;

use cruet::Inflector;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiConfig, ConfigError, Credentials, Timeouts};

/// Where to read the configuration from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// An exported environment document: `{"values": [{"key", "value", "enabled"}]}`.
    Exported(String),
    /// A flat JSON object, e.g. `{"baseUrl": "...", "clientId": "..."}`.
    FlatJson(String),
    /// Any JSON document, exported or flat, detected from its shape.
    Json(String),
    /// Plain key/value pairs.
    Entries(Vec<(String, String)>),
    /// The process environment (`BASE_URL`, `CLIENT_ID`, ...).
    Environment,
    /// A JSON file, or a YAML file when the `yaml` feature is enabled.
    File(PathBuf),
}

/// Loads and validates an [`ApiConfig`].
///
/// Keys are normalized through the alias table of [`ConfigKey`], disabled
/// entries and unknown keys are ignored, and blank values count as absent.
///
/// # Errors
///
/// - [`ConfigError::Missing`] listing every absent required field,
/// - [`ConfigError::InvalidUrl`] for a malformed base or token URL,
/// - a parse or I/O error when the source cannot be read.
pub fn load(source: ConfigSource) -> Result<ApiConfig, ConfigError> {
    let entries = match source {
        ConfigSource::Exported(text) => exported_entries(serde_json::from_str(&text)?)?,
        ConfigSource::FlatJson(text) => flat_entries(serde_json::from_str(&text)?)?,
        ConfigSource::Json(text) => json_entries(serde_json::from_str(&text)?)?,
        ConfigSource::Entries(entries) => entries,
        ConfigSource::Environment => std::env::vars().collect(),
        ConfigSource::File(path) => file_entries(&path)?,
    };
    ApiConfig::from_entries(entries)
}

impl ApiConfig {
    /// Builds a configuration from key/value pairs.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = IndexMap::<ConfigKey, String>::new();
        for (key, value) in entries {
            let Some(config_key) = ConfigKey::from_alias(key.as_ref()) else {
                continue;
            };
            let value = value.into();
            if value.trim().is_empty() {
                continue;
            }
            values.insert(config_key, value.trim().to_string());
        }
        debug!(keys = ?values.keys().collect::<Vec<_>>(), "configuration keys resolved");

        let missing = ConfigKey::REQUIRED
            .iter()
            .filter(|key| !values.contains_key(*key))
            .map(|key| key.name())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { fields: missing });
        }

        let mut take = |key: ConfigKey| values.shift_remove(&key).unwrap_or_default();
        let base_url = take(ConfigKey::BaseUrl);
        let client_id = take(ConfigKey::ClientId);
        let client_secret = take(ConfigKey::ClientSecret);
        let token_url = take(ConfigKey::TokenUrl);

        let mut credentials = Credentials::new(client_id, client_secret, token_url)?;
        if let Some(scope) = values.shift_remove(&ConfigKey::Scope) {
            credentials = credentials.with_scope(scope);
        }

        let mut config = Self::new(&base_url, credentials)?;

        let mut timeouts = Timeouts::default();
        for (key, value) in values {
            match key {
                ConfigKey::ProgramId => config.program_id = Some(value),
                ConfigKey::ProgramInstitutionId => config.program_institution_id = Some(value),
                ConfigKey::ParentProgramInstitutionId => {
                    config.parent_program_institution_id = Some(value);
                }
                ConfigKey::VendorId => config.vendor_id = Some(value),
                ConfigKey::SponsorId => config.sponsor_id = Some(value),
                ConfigKey::ConnectTimeoutMs => timeouts.connect = parse_millis(key, &value)?,
                ConfigKey::RequestTimeoutMs => timeouts.request = parse_millis(key, &value)?,
                ConfigKey::BaseUrl
                | ConfigKey::ClientId
                | ConfigKey::ClientSecret
                | ConfigKey::TokenUrl
                | ConfigKey::Scope => {}
            }
        }
        config.timeouts = timeouts;

        Ok(config)
    }

    /// Builds a configuration from an exported environment document.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub fn from_exported_json(text: &str) -> Result<Self, ConfigError> {
        load(ConfigSource::Exported(text.to_string()))
    }

    /// Builds a configuration from any supported JSON document.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        load(ConfigSource::Json(text.to_string()))
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub fn from_env() -> Result<Self, ConfigError> {
        load(ConfigSource::Environment)
    }

    /// Builds a configuration from a file.
    ///
    /// # Errors
    ///
    /// See [`load`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load(ConfigSource::File(path.as_ref().to_path_buf()))
    }
}

/// Canonical configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// API base URL.
    BaseUrl,
    /// OAuth2 client id.
    ClientId,
    /// OAuth2 client secret.
    ClientSecret,
    /// OAuth2 token endpoint.
    TokenUrl,
    /// OAuth2 scope.
    Scope,
    /// Default `program-id`.
    ProgramId,
    /// Default `program-institution-id`.
    ProgramInstitutionId,
    /// Default `parent-program-institution-id`.
    ParentProgramInstitutionId,
    /// Default `vendor-id`.
    VendorId,
    /// Default `sponsor-id`.
    SponsorId,
    /// Connect timeout in milliseconds.
    ConnectTimeoutMs,
    /// Request timeout in milliseconds.
    RequestTimeoutMs,
}

impl ConfigKey {
    const REQUIRED: [Self; 4] = [
        Self::BaseUrl,
        Self::ClientId,
        Self::ClientSecret,
        Self::TokenUrl,
    ];

    /// Resolves a raw key through the alias table.
    ///
    /// The key is first folded to `snake_case`, so `clientId`, `client-id`,
    /// `CLIENT_ID` and `client_id` are the same key.
    pub fn from_alias(raw: &str) -> Option<Self> {
        let key = raw.trim().to_snake_case();
        let result = match key.as_str() {
            "base_url" | "api_url" | "api_base_url" => Self::BaseUrl,
            "client_id" | "oauth_client_id" => Self::ClientId,
            "client_secret" | "oauth_client_secret" => Self::ClientSecret,
            "token_url" | "token_endpoint" | "auth_url" | "oauth_token_url" => Self::TokenUrl,
            "scope" | "oauth_scope" => Self::Scope,
            "program_id" | "default_program_id" => Self::ProgramId,
            "program_institution_id" | "default_program_institution_id" => {
                Self::ProgramInstitutionId
            }
            "parent_program_institution_id" => Self::ParentProgramInstitutionId,
            "vendor_id" => Self::VendorId,
            "sponsor_id" => Self::SponsorId,
            "connect_timeout_ms" => Self::ConnectTimeoutMs,
            "request_timeout_ms" => Self::RequestTimeoutMs,
            _ => return None,
        };
        Some(result)
    }

    /// The canonical `snake_case` name.
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseUrl => "base_url",
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::TokenUrl => "token_url",
            Self::Scope => "scope",
            Self::ProgramId => "program_id",
            Self::ProgramInstitutionId => "program_institution_id",
            Self::ParentProgramInstitutionId => "parent_program_institution_id",
            Self::VendorId => "vendor_id",
            Self::SponsorId => "sponsor_id",
            Self::ConnectTimeoutMs => "connect_timeout_ms",
            Self::RequestTimeoutMs => "request_timeout_ms",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExportedEnvironment {
    values: Vec<ExportedEntry>,
}

#[derive(Debug, Deserialize)]
struct ExportedEntry {
    key: String,
    #[serde(default)]
    value: Value,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

fn exported_entries(document: Value) -> Result<Vec<(String, String)>, ConfigError> {
    let environment = serde_json::from_value::<ExportedEnvironment>(document)?;
    let entries = environment
        .values
        .into_iter()
        .filter(|entry| entry.enabled)
        .filter_map(|entry| scalar_to_string(&entry.value).map(|value| (entry.key, value)))
        .collect();
    Ok(entries)
}

fn flat_entries(document: Value) -> Result<Vec<(String, String)>, ConfigError> {
    let Value::Object(map) = document else {
        return Err(ConfigError::InvalidFormat {
            message: "expected a JSON object".to_string(),
        });
    };
    let entries = map
        .into_iter()
        .filter_map(|(key, value)| scalar_to_string(&value).map(|value| (key, value)))
        .collect();
    Ok(entries)
}

fn json_entries(document: Value) -> Result<Vec<(String, String)>, ConfigError> {
    if document.get("values").is_some_and(Value::is_array) {
        exported_entries(document)
    } else {
        flat_entries(document)
    }
}

fn file_entries(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
        path: path.display().to_string(),
        error,
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml" | "yml") => yaml_entries(&text),
        _ => json_entries(serde_json::from_str(&text)?),
    }
}

#[cfg(feature = "yaml")]
fn yaml_entries(text: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let document = crate::yaml::from_yaml::<Value>(text).map_err(|err| {
        ConfigError::InvalidFormat {
            message: err.to_string(),
        }
    })?;
    json_entries(document)
}

#[cfg(not(feature = "yaml"))]
fn yaml_entries(_text: &str) -> Result<Vec<(String, String)>, ConfigError> {
    Err(ConfigError::InvalidFormat {
        message: "YAML configuration requires the `yaml` feature".to_string(),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => {
            warn!("ignoring non-scalar configuration value");
            None
        }
    }
}

fn parse_millis(key: ConfigKey, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidValue {
            field: key.name(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORTED: &str = r#"{
        "name": "ITS sandbox",
        "values": [
            {"key": "baseUrl", "value": "https://api.example.com/v1", "enabled": true},
            {"key": "client-id", "value": "client-1", "enabled": true},
            {"key": "client-secret", "value": "secret-1", "type": "secret", "enabled": true},
            {"key": "auth-url", "value": "https://auth.example.com/connect/token", "enabled": true},
            {"key": "scope", "value": "its-api", "enabled": true},
            {"key": "program-id", "value": "238", "enabled": true},
            {"key": "program-institution-id", "value": "inst-7", "enabled": false},
            {"key": "unrelated", "value": "ignored", "enabled": true}
        ]
    }"#;

    #[test]
    fn should_load_exported_environment() {
        let config = ApiConfig::from_exported_json(EXPORTED).expect("valid config");

        assert_eq!(config.base_url().as_str(), "https://api.example.com/v1");
        assert_eq!(config.credentials().client_id(), "client-1");
        assert!(config.credentials().client_secret().equals_str("secret-1"));
        assert_eq!(
            config.credentials().token_url().as_str(),
            "https://auth.example.com/connect/token"
        );
        assert_eq!(config.credentials().scope(), Some("its-api"));
        assert_eq!(config.program_id(), Some("238"));
        // disabled entry
        assert_eq!(config.program_institution_id(), None);
    }

    #[test]
    fn should_load_flat_json() {
        let text = r#"{
            "tokenEndpoint": "https://auth.example.com/token",
            "clientId": "client-2",
            "clientSecret": "secret-2",
            "baseUrl": "https://api.example.com",
            "programId": 238,
            "programInstitutionId": "inst-9"
        }"#;

        let config = ApiConfig::from_json_str(text).expect("valid config");

        assert_eq!(config.credentials().client_id(), "client-2");
        assert_eq!(config.program_id(), Some("238"));
        assert_eq!(config.program_institution_id(), Some("inst-9"));
        assert_eq!(config.credentials().scope(), None);
    }

    #[test]
    fn should_detect_exported_layout_from_json() {
        let config = ApiConfig::from_json_str(EXPORTED).expect("valid config");
        assert_eq!(config.credentials().client_id(), "client-1");
    }

    #[test]
    fn should_normalize_environment_variable_names() {
        let entries = vec![
            ("BASE_URL", "https://api.example.com"),
            ("CLIENT_ID", "client-3"),
            ("CLIENT_SECRET", "secret-3"),
            ("TOKEN_URL", "https://auth.example.com/token"),
            ("DEFAULT_PROGRAM_ID", "42"),
            ("PROGRAM_INSTITUTION_ID", "inst-3"),
            ("VENDOR_ID", "vendor-1"),
            ("REQUEST_TIMEOUT_MS", "2500"),
            ("PATH", "/usr/bin"),
        ];

        let config = ApiConfig::from_entries(entries).expect("valid config");

        assert_eq!(config.program_id(), Some("42"));
        assert_eq!(config.program_institution_id(), Some("inst-3"));
        assert_eq!(config.vendor_id(), Some("vendor-1"));
        assert_eq!(config.timeouts().request, Duration::from_millis(2500));
        assert_eq!(config.timeouts().connect, Duration::from_secs(5));
    }

    #[test]
    fn should_list_every_missing_field() {
        let entries = vec![("clientId", "client"), ("clientSecret", "  ")];

        let error = ApiConfig::from_entries(entries).expect_err("should fail");

        let ConfigError::Missing { fields } = error else {
            panic!("expected missing fields, got {error:?}");
        };
        assert_eq!(fields, vec!["base_url", "client_secret", "token_url"]);
    }

    #[test]
    fn should_not_substitute_sample_program_ids() {
        let entries = vec![
            ("baseUrl", "https://api.example.com"),
            ("clientId", "client"),
            ("clientSecret", "secret"),
            ("tokenEndpoint", "https://auth.example.com/token"),
        ];

        let config = ApiConfig::from_entries(entries).expect("valid config");

        assert_eq!(config.program_id(), None);
        assert_eq!(config.program_institution_id(), None);
    }

    #[test]
    fn should_reject_invalid_base_url() {
        let entries = vec![
            ("baseUrl", "api.example.com"),
            ("clientId", "client"),
            ("clientSecret", "secret"),
            ("tokenEndpoint", "https://auth.example.com/token"),
        ];

        let error = ApiConfig::from_entries(entries).expect_err("should fail");

        assert!(matches!(
            error,
            ConfigError::InvalidUrl {
                field: "base_url",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_invalid_timeout() {
        let entries = vec![
            ("baseUrl", "https://api.example.com"),
            ("clientId", "client"),
            ("clientSecret", "secret"),
            ("tokenEndpoint", "https://auth.example.com/token"),
            ("connect-timeout-ms", "soon"),
        ];

        let error = ApiConfig::from_entries(entries).expect_err("should fail");

        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_non_object_json() {
        let error = ApiConfig::from_json_str("[1, 2]").expect_err("should fail");
        assert!(matches!(error, ConfigError::InvalidFormat { .. }));
    }

    #[test]
    fn should_report_unreadable_file() {
        let error = ApiConfig::from_path("/definitely/not/here.json").expect_err("should fail");
        assert!(matches!(error, ConfigError::Io { .. }));
    }

    #[test]
    fn should_resolve_aliases() {
        assert_eq!(ConfigKey::from_alias("auth-url"), Some(ConfigKey::TokenUrl));
        assert_eq!(ConfigKey::from_alias("tokenEndpoint"), Some(ConfigKey::TokenUrl));
        assert_eq!(ConfigKey::from_alias("TOKEN_URL"), Some(ConfigKey::TokenUrl));
        assert_eq!(ConfigKey::from_alias("baseUrl"), Some(ConfigKey::BaseUrl));
        assert_eq!(ConfigKey::from_alias("base-url"), Some(ConfigKey::BaseUrl));
        assert_eq!(
            ConfigKey::from_alias("parent-program-institution-id"),
            Some(ConfigKey::ParentProgramInstitutionId)
        );
        assert_eq!(ConfigKey::from_alias("HOME"), None);
    }
}
