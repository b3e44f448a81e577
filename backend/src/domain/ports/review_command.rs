//! Driving ports for review use-cases.

use async_trait::async_trait;

use crate::domain::{Error, InstitutionId, NewReview, Review, ReviewId, ReviewPatch, UserId};

use super::ImageFile;

/// Request to post a review as `actor`.
#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    pub actor: UserId,
    pub input: NewReview,
    pub images: Vec<ImageFile>,
}

/// Request to patch a review the actor wrote.
#[derive(Debug, Clone)]
pub struct UpdateReviewRequest {
    pub actor: UserId,
    pub id: ReviewId,
    pub patch: ReviewPatch,
    pub images: Vec<ImageFile>,
}

#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Post a review; 404 when the institution does not exist.
    async fn create(&self, request: CreateReviewRequest) -> Result<Review, Error>;

    async fn update(&self, request: UpdateReviewRequest) -> Result<Review, Error>;

    async fn delete(&self, actor: &UserId, id: &ReviewId) -> Result<(), Error>;
}

#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews of one institution, newest first.
    async fn for_institution(&self, institution: &InstitutionId) -> Result<Vec<Review>, Error>;

    /// Reviews written by one user, newest first.
    async fn by_user(&self, user: &UserId) -> Result<Vec<Review>, Error>;
}
