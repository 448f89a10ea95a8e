//! Query parameter types for building API calls.
//!
//! - [`ParamValue`] and [`ParamStyle`] - a single value and its list layout
//! - [`RequestParameters`] - the ordered set sent as query string
//! - [`OperationParams`] - typed records for the most used operations

mod param;
pub use self::param::{ParamStyle, ParamValue};

mod request;
pub use self::request::RequestParameters;

mod records;
pub use self::records::{
    EventAuthorizationQuery, EventClassQuery, EventQuery, FormQuery,
    LongitudinalGroupExamineesQuery, OperationParams, OrderQuery, RegistrationQuery,
    RemoteSessionQuery, SessionQuery, UserAccessQuery,
};
