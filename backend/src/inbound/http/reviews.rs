//! Review handlers.
//!
//! Reviews for an institution are public. Creating, listing by author,
//! updating and deleting need a bearer token; updates and deletes only match
//! the caller's own reviews.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::ownership::REVIEW;
use crate::domain::ports::{CreateReviewRequest, UpdateReviewRequest};
use crate::domain::{InstitutionId, NewReview, Review, ReviewId, ReviewPatch, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::MessageBody;
use crate::inbound::http::auth::{AuthenticatedUser, RequireAuth};
use crate::inbound::http::payload::FormPayload;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, ReviewRequestSchema, ReviewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_resource_validation_error, parse_path_id};

/// Review an existing institution.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body(
        content(
            (ReviewRequestSchema = "application/json"),
            (ReviewRequestSchema = "multipart/form-data")
        )
    ),
    responses(
        (status = 201, description = "Created", body = ReviewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Institution not found", body = ErrorSchema),
        (status = 500, description = "Upload or server failure", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews", wrap = "RequireAuth")]
pub async fn create_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: FormPayload,
) -> ApiResult<HttpResponse> {
    let input = NewReview::try_from_parts(
        payload.text("rating"),
        payload.text("comment"),
        payload.text("institution"),
    )
    .map_err(map_resource_validation_error)?;
    let created = state
        .reviews
        .create(CreateReviewRequest {
            actor: *user.id(),
            input,
            images: payload.into_files(),
        })
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Reviews of one institution, newest first.
#[utoipa::path(
    get,
    path = "/reviews/institution/{institution_id}",
    params(("institution_id" = String, Path, description = "Institution identifier")),
    responses(
        (status = 200, description = "Reviews", body = [ReviewSchema]),
        (status = 400, description = "Invalid id", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listInstitutionReviews",
    security([])
)]
#[get("/reviews/institution/{institution_id}")]
pub async fn reviews_for_institution(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let institution = parse_path_id::<InstitutionId>(&path, "institution_id")?;
    let records = state.reviews_query.for_institution(&institution).await?;
    Ok(web::Json(records))
}

/// Reviews written by one user, newest first.
#[utoipa::path(
    get,
    path = "/reviews/user/{user_id}",
    params(("user_id" = String, Path, description = "Author identifier")),
    responses(
        (status = 200, description = "Reviews", body = [ReviewSchema]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listUserReviews"
)]
#[get("/reviews/user/{user_id}", wrap = "RequireAuth")]
pub async fn reviews_by_user(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let author = parse_path_id::<UserId>(&path, "user_id")?;
    let records = state.reviews_query.by_user(&author).await?;
    Ok(web::Json(records))
}

/// Update the caller's review. Uploaded images are appended.
#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    request_body(
        content(
            (ReviewRequestSchema = "application/json"),
            (ReviewRequestSchema = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Updated", body = ReviewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not yours", body = ErrorSchema),
        (status = 500, description = "Upload or server failure", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[patch("/reviews/{id}", wrap = "RequireAuth")]
pub async fn update_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: FormPayload,
) -> ApiResult<web::Json<Review>> {
    let id = parse_path_id::<ReviewId>(&path, "id")?;
    let patch = ReviewPatch::try_from_parts(payload.text("rating"), payload.text("comment"))
        .map_err(map_resource_validation_error)?;
    let updated = state
        .reviews
        .update(UpdateReviewRequest {
            actor: *user.id(),
            id,
            patch,
            images: payload.into_files(),
        })
        .await?;
    Ok(web::Json(updated))
}

/// Delete the caller's review.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not yours", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}", wrap = "RequireAuth")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = parse_path_id::<ReviewId>(&path, "id")?;
    state.reviews.delete(user.id(), &id).await?;
    Ok(web::Json(MessageBody::new(REVIEW.deleted)))
}
