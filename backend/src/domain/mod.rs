//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, plus the services that enforce authentication and ownership.
//! Nothing in here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User, Institution, Review: records returned to clients.
//! - TokenService: bearer token issue and verification.
//! - AccountService, InstitutionService, ReviewService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ids;
pub mod institution;
pub mod institution_service;
pub mod ownership;
pub mod ports;
pub mod review;
pub mod review_service;
mod service_support;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{AccountPatch, AuthValidationError, LoginCredentials, Password, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdValidationError, InstitutionId, ReviewId, UserId};
pub use self::institution::{
    Institution, InstitutionPatch, NewInstitution, ResourceValidationError,
};
pub use self::institution_service::InstitutionService;
pub use self::ownership::OwnedBy;
pub use self::review::{NewReview, Rating, Review, ReviewPatch};
pub use self::review_service::ReviewService;
pub use self::token::{DEFAULT_TOKEN_TTL, TokenError, TokenIssueError, TokenService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, PasswordHash, StoredUser, User, UserChanges, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Unauthorized - No token provided"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
