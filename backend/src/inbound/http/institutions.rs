//! Institution handlers.
//!
//! Listing is public. Everything else needs a bearer token, and updates and
//! deletes only match institutions the caller added.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::ownership::INSTITUTION;
use crate::domain::ports::{CreateInstitutionRequest, UpdateInstitutionRequest};
use crate::domain::{Institution, InstitutionId, InstitutionPatch, NewInstitution};
use crate::inbound::http::ApiResult;
use crate::inbound::http::MessageBody;
use crate::inbound::http::auth::{AuthenticatedUser, RequireAuth};
use crate::inbound::http::payload::FormPayload;
use crate::inbound::http::schemas::{
    ErrorSchema, InstitutionRequestSchema, InstitutionSchema, MessageSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_resource_validation_error, parse_path_id};

/// List every institution in insertion order.
#[utoipa::path(
    get,
    path = "/institutions",
    responses(
        (status = 200, description = "Institutions", body = [InstitutionSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "listInstitutions",
    security([])
)]
#[get("/institutions")]
pub async fn list_institutions(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Institution>>> {
    let records = state.institutions_query.list().await?;
    Ok(web::Json(records))
}

/// Add an institution. The caller becomes `addedBy`.
#[utoipa::path(
    post,
    path = "/institutions",
    request_body(
        content(
            (InstitutionRequestSchema = "application/json"),
            (InstitutionRequestSchema = "multipart/form-data")
        )
    ),
    responses(
        (status = 201, description = "Created", body = InstitutionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Upload or server failure", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "createInstitution"
)]
#[post("/institutions", wrap = "RequireAuth")]
pub async fn create_institution(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: FormPayload,
) -> ApiResult<HttpResponse> {
    let input = NewInstitution::try_from_parts(
        payload.text("name"),
        payload.text("location"),
        payload.text("description"),
        payload.text("owner"),
    )
    .map_err(map_resource_validation_error)?;
    let created = state
        .institutions
        .create(CreateInstitutionRequest {
            actor: *user.id(),
            input,
            images: payload.into_files(),
        })
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch one institution.
#[utoipa::path(
    get,
    path = "/institutions/{id}",
    params(("id" = String, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Institution", body = InstitutionSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "getInstitution"
)]
#[get("/institutions/{id}", wrap = "RequireAuth")]
pub async fn get_institution(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Institution>> {
    let id = parse_path_id::<InstitutionId>(&path, "id")?;
    let record = state.institutions_query.get(&id).await?;
    Ok(web::Json(record))
}

/// Update an institution the caller added. Uploaded images are appended.
#[utoipa::path(
    patch,
    path = "/institutions/{id}",
    params(("id" = String, Path, description = "Institution identifier")),
    request_body(
        content(
            (InstitutionRequestSchema = "application/json"),
            (InstitutionRequestSchema = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Updated", body = InstitutionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not yours", body = ErrorSchema),
        (status = 500, description = "Upload or server failure", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "updateInstitution"
)]
#[patch("/institutions/{id}", wrap = "RequireAuth")]
pub async fn update_institution(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: FormPayload,
) -> ApiResult<web::Json<Institution>> {
    let id = parse_path_id::<InstitutionId>(&path, "id")?;
    let patch = InstitutionPatch::try_from_parts(
        payload.text("name"),
        payload.text("location"),
        payload.text("description"),
        payload.text("owner"),
    )
    .map_err(map_resource_validation_error)?;
    let updated = state
        .institutions
        .update(UpdateInstitutionRequest {
            actor: *user.id(),
            id,
            patch,
            images: payload.into_files(),
        })
        .await?;
    Ok(web::Json(updated))
}

/// Delete an institution the caller added, with its reviews.
#[utoipa::path(
    delete,
    path = "/institutions/{id}",
    params(("id" = String, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not yours", body = ErrorSchema)
    ),
    tags = ["institutions"],
    operation_id = "deleteInstitution"
)]
#[delete("/institutions/{id}", wrap = "RequireAuth")]
pub async fn delete_institution(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = parse_path_id::<InstitutionId>(&path, "id")?;
    state.institutions.delete(user.id(), &id).await?;
    Ok(web::Json(MessageBody::new(INSTITUTION.deleted)))
}
