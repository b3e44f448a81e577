//! Registration, login and profile handlers.
//!
//! ```text
//! POST /auth/register {"name":"Ada","email":"ada@example.com","password":"pw"}
//! POST /auth/login {"email":"ada@example.com","password":"pw"}
//! GET /auth/profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::ports::AuthSession;
use crate::domain::{LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, RequireAuth};
use crate::inbound::http::payload::FormPayload;
use crate::inbound::http::schemas::{
    AuthSessionSchema, ErrorSchema, LoginRequestSchema, RegisterRequestSchema, UserSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation_error;

pub(crate) const REGISTERED: &str = "User registered successfully";
pub(crate) const LOGGED_IN: &str = "Login successful";

/// Response body carrying a freshly issued token.
#[derive(Debug, Serialize)]
pub struct AuthSessionBody {
    message: &'static str,
    token: String,
    user: User,
}

impl AuthSessionBody {
    fn new(message: &'static str, session: AuthSession) -> Self {
        Self {
            message,
            token: session.token,
            user: session.user,
        }
    }
}

/// Create an account and return a bearer token for it.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body(content = RegisterRequestSchema, content_type = "application/json"),
    responses(
        (status = 201, description = "Account created", body = AuthSessionSchema),
        (status = 400, description = "Invalid request or email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: FormPayload,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from_parts(
        payload.text("name"),
        payload.text("email"),
        payload.text("password"),
    )
    .map_err(map_auth_validation_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthSessionBody::new(REGISTERED, session)))
}

/// Exchange email and password for a bearer token.
///
/// Unknown emails and wrong passwords get the same `401` response.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginRequestSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "Login success", body = AuthSessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(state: web::Data<HttpState>, payload: FormPayload) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from_parts(payload.text("email"), payload.text("password"))
            .map_err(map_auth_validation_error)?;
    let session = state.accounts.login(credentials).await?;
    Ok(HttpResponse::Ok().json(AuthSessionBody::new(LOGGED_IN, session)))
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "profile"
)]
#[get("/auth/profile", wrap = "RequireAuth")]
pub async fn profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<User>> {
    let record = state.accounts_query.profile(user.id()).await?;
    Ok(web::Json(record))
}
