//! OpenAPI schema definitions for domain types and request bodies.
//!
//! Domain types stay free of utoipa derives. The wrappers here mirror their
//! serialised shape and are registered under the domain type names.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required field is missing or malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// A path identifier is not a UUID.
    #[schema(rename = "invalid_id")]
    InvalidId,
    /// The bearer token is missing, invalid or expired.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Nothing matched, including records owned by someone else.
    #[schema(rename = "not_found")]
    NotFound,
    /// The image host rejected or failed an upload.
    #[schema(rename = "upload_failed")]
    UploadFailed,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error response payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "Review not found")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "0f5c2b8e-3d0e-4e43-9a57-0a3c8fb1a6de")]
    trace_id: Option<String>,
}

/// Public user record. Password digests are never returned.
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    verified: bool,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// Reviewable institution.
#[derive(ToSchema)]
#[schema(as = crate::domain::Institution, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct InstitutionSchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(example = "Central Library")]
    name: String,
    #[schema(example = "Market Street")]
    location: String,
    description: String,
    /// Real-world owner. Grants no permissions.
    #[schema(format = Uuid)]
    owner: Option<String>,
    /// Creator; the only user allowed to update or delete the record.
    #[schema(format = Uuid)]
    added_by: String,
    /// Image URLs, oldest first.
    images: Vec<String>,
}

/// Review of an institution.
#[derive(ToSchema)]
#[schema(as = crate::domain::Review, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReviewSchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(minimum = 1, maximum = 5, example = 4)]
    rating: i16,
    comment: String,
    /// Author.
    #[schema(format = Uuid)]
    user: String,
    #[schema(format = Uuid)]
    institution: String,
    images: Vec<String>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// Token issued on registration or login.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AuthSessionSchema {
    #[schema(example = "Login successful")]
    message: String,
    /// Bearer token for the `Authorization` header.
    token: String,
    user: UserSchema,
}

/// Confirmation message.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageSchema {
    #[schema(example = "Review deleted successfully")]
    message: String,
}

/// Body of `POST /auth/register`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RegisterRequestSchema {
    name: String,
    email: String,
    password: String,
}

/// Body of `POST /auth/login`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LoginRequestSchema {
    email: String,
    password: String,
}

/// Body of `PATCH /users/{id}`. Every field is optional.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AccountPatchSchema {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// JSON or multipart body for institution create and update. Files go in
/// the `images` part of a multipart body.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct InstitutionRequestSchema {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    #[schema(format = Uuid)]
    owner: Option<String>,
    /// Multipart only: image files, appended to the stored list.
    images: Option<Vec<String>>,
}

/// JSON or multipart body for review create and update.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReviewRequestSchema {
    /// Number or numeric string between 1 and 5.
    rating: Option<String>,
    comment: Option<String>,
    /// Required on create.
    #[schema(format = Uuid)]
    institution: Option<String>,
    /// Multipart only: image files, appended to the stored list.
    images: Option<Vec<String>>,
}
