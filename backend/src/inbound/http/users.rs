//! User record handlers.
//!
//! Any authenticated caller may read a user. Updates and deletes only apply
//! to the caller's own record; any other id answers `404 User not found`.

use actix_web::{delete, get, patch, web};

use crate::domain::ownership::ACCOUNT;
use crate::domain::{AccountPatch, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::MessageBody;
use crate::inbound::http::auth::{AuthenticatedUser, RequireAuth};
use crate::inbound::http::payload::FormPayload;
use crate::inbound::http::schemas::{AccountPatchSchema, ErrorSchema, MessageSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_auth_validation_error, parse_path_id};

/// Fetch a user's public record.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}", wrap = "RequireAuth")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_path_id::<UserId>(&path, "id")?;
    let record = state.accounts_query.get(&id).await?;
    Ok(web::Json(record))
}

/// Change the caller's name, email or password.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body(content = AccountPatchSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}", wrap = "RequireAuth")]
pub async fn update_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: FormPayload,
) -> ApiResult<web::Json<User>> {
    let target = parse_path_id::<UserId>(&path, "id")?;
    let patch = AccountPatch::try_from_parts(
        payload.text("name"),
        payload.text("email"),
        payload.text("password"),
    )
    .map_err(map_auth_validation_error)?;
    let record = state.accounts.update(user.id(), &target, patch).await?;
    Ok(web::Json(record))
}

/// Delete the caller's account along with everything they created.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}", wrap = "RequireAuth")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let target = parse_path_id::<UserId>(&path, "id")?;
    state.accounts.delete(user.id(), &target).await?;
    Ok(web::Json(MessageBody::new(ACCOUNT.deleted)))
}
