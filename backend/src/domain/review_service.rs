//! Review service implementing the review driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::institution_service::map_institution_error;
use crate::domain::ownership::{INSTITUTION, REVIEW};
use crate::domain::ports::{
    CreateReviewRequest, ImageUploader, InstitutionRepository, ReviewCommand, ReviewQuery,
    ReviewRepository, ReviewRepositoryError, UpdateReviewRequest, UserRepository,
};
use crate::domain::service_support::{require_actor, upload_images, warn_if_orphaned};
use crate::domain::{Error, InstitutionId, OwnedBy, Review, ReviewId, UserId};

/// Review commands and queries.
///
/// Institutions are consulted so reviews never point at a missing record.
#[derive(Clone)]
pub struct ReviewService<R, I, U> {
    reviews: Arc<R>,
    institutions: Arc<I>,
    users: Arc<U>,
    uploader: Arc<dyn ImageUploader>,
    clock: Arc<dyn Clock>,
}

impl<R, I, U> ReviewService<R, I, U> {
    /// Create a new service; `clock` stamps `createdAt` and `updatedAt`.
    pub fn new(
        reviews: Arc<R>,
        institutions: Arc<I>,
        users: Arc<U>,
        uploader: Arc<dyn ImageUploader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reviews,
            institutions,
            users,
            uploader,
            clock,
        }
    }
}

fn map_review_error(err: ReviewRepositoryError) -> Error {
    match err {
        ReviewRepositoryError::MissingReference { .. } => Error::not_found(INSTITUTION.not_found),
        ReviewRepositoryError::Connection { message }
        | ReviewRepositoryError::Query { message } => {
            error!(%message, "review store failure");
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R, I, U> ReviewCommand for ReviewService<R, I, U>
where
    R: ReviewRepository,
    I: InstitutionRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateReviewRequest) -> Result<Review, Error> {
        let CreateReviewRequest {
            actor,
            input,
            images,
        } = request;
        require_actor(self.users.as_ref(), &actor).await?;
        let institution = self
            .institutions
            .find_by_id(&input.institution)
            .await
            .map_err(map_institution_error)?;
        INSTITUTION.require(institution)?;
        let images = upload_images(self.uploader.as_ref(), images).await?;

        let now = self.clock.utc();
        let review = Review {
            id: ReviewId::random(),
            rating: input.rating,
            comment: input.comment,
            user: actor,
            institution: input.institution,
            images,
            created_at: now,
            updated_at: now,
        };
        let stored = self.reviews.create(&review).await.map_err(map_review_error);
        warn_if_orphaned(stored, &review.images)?;
        info!(review_id = %review.id, institution_id = %review.institution, "review created");
        Ok(review)
    }

    async fn update(&self, request: UpdateReviewRequest) -> Result<Review, Error> {
        let UpdateReviewRequest {
            actor,
            id,
            patch,
            images,
        } = request;
        let images = upload_images(self.uploader.as_ref(), images).await?;
        let updated = self
            .reviews
            .update_owned(OwnedBy::new(id, actor), &patch, &images, self.clock.utc())
            .await
            .map_err(map_review_error)
            .and_then(|matched| REVIEW.require(matched));
        warn_if_orphaned(updated, &images)
    }

    async fn delete(&self, actor: &UserId, id: &ReviewId) -> Result<(), Error> {
        let removed = self
            .reviews
            .delete_owned(OwnedBy::new(*id, *actor))
            .await
            .map_err(map_review_error)?;
        REVIEW.require(removed)?;
        info!(review_id = %id, "review deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, I, U> ReviewQuery for ReviewService<R, I, U>
where
    R: ReviewRepository,
    I: InstitutionRepository,
    U: UserRepository,
{
    async fn for_institution(&self, institution: &InstitutionId) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_by_institution(institution)
            .await
            .map_err(map_review_error)
    }

    async fn by_user(&self, user: &UserId) -> Result<Vec<Review>, Error> {
        self.reviews.list_by_user(user).await.map_err(map_review_error)
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
