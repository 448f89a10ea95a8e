//! # ITS API Core
//!
//! Authenticated client and test-harness layer for the ITS API, an
//! educational-testing REST API secured with OAuth2 client credentials.
//!
//! The crate is organized as a pipeline:
//!
//! - **[`config`]** - loads credentials and defaults from exported
//!   environments, flat JSON, process variables or files
//! - **[`TokenManager`]** - acquires and caches the bearer token, refreshing
//!   it before expiry and coalescing concurrent refreshes
//! - **[`validate`]** - checks parameters against the bundled [`Catalog`]
//!   rule table before any network call
//! - **[`ApiClient`]** - sends the request and returns a uniform [`ApiResult`]
//! - **[`shape`]** - optional business annotation of a result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use itsapi_core::config::{ConfigSource, load};
//! use itsapi_core::{ApiClient, EventQuery, shape};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load(ConfigSource::File("environment.json".into()))?;
//! let client = ApiClient::builder().with_config(config).build()?;
//!
//! let query = EventQuery {
//!     program_id: String::from("238"),
//!     active_only: Some(true),
//!     ..EventQuery::default()
//! };
//! let result = client.send(&query, None).await?;
//!
//! let annotation = shape("eventQuery", &result);
//! println!("{}", annotation.interpretation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`ApiClientError`]. Configuration and
//! validation errors happen before any I/O; authentication and transport
//! errors come from the network. API answers with a non-2xx status are *not*
//! errors: a 422 business validation failure is an [`ApiResult`] whose
//! [`is_ok`](ApiResult::is_ok) is `false`.
//!
//! ## Features
//!
//! - `tls` (default) - HTTPS support through reqwest's default TLS backend
//! - `yaml` - YAML configuration files and [`ToYaml`] rendering

pub mod catalog;
mod client;
pub mod config;
mod shaper;
pub mod validation;

#[cfg(feature = "yaml")]
mod yaml;

pub use self::catalog::{Catalog, Domain, Operation, ParamSpec};
pub use self::client::oauth2;
pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, ApiResult, BearerToken, EventAuthorizationQuery,
    EventClassQuery, EventQuery, FormQuery, LongitudinalGroupExamineesQuery, OperationParams,
    OrderQuery, ParamStyle, ParamValue, RegistrationQuery, RemoteSessionQuery, RequestParameters,
    ResponseBody, SecureString, SessionQuery, TokenManager, TransportError, TransportErrorKind,
    UserAccessQuery,
};
pub use self::shaper::{Link, ResponseAnnotation, shape};
pub use self::validation::{ValidationError, ValidationErrorKind, validate, validate_body};

#[cfg(feature = "yaml")]
pub use self::yaml::{ToYaml, YamlError, YamlParseError, from_yaml};
