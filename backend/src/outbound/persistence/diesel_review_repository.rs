//! PostgreSQL-backed `ReviewRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{InstitutionId, OwnedBy, Rating, Review, ReviewId, ReviewPatch, UserId};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{NewReviewRow, ReviewRow, ReviewUpdate};
use super::pool::DbPool;
use super::schema::reviews;

/// Diesel-backed review repository.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ReviewRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation(constraint) => {
            ReviewRepositoryError::missing_reference(constraint)
        }
        StoreFailure::Query(message) | StoreFailure::UniqueViolation(message) => {
            ReviewRepositoryError::query(message)
        }
    }
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let rating = Rating::try_from(row.rating).map_err(|err| {
        ReviewRepositoryError::query(format!("stored review {} is invalid: {err}", row.id))
    })?;
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        rating,
        comment: row.comment,
        user: UserId::from_uuid(row.user_id),
        institution: InstitutionId::from_uuid(row.institution_id),
        images: row.images,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>, ReviewRepositoryError> {
    rows.into_iter().map(row_to_review).collect()
}

fn owned(
    filter: OwnedBy<ReviewId>,
) -> diesel::dsl::Filter<
    reviews::table,
    diesel::dsl::And<
        diesel::dsl::Eq<reviews::id, uuid::Uuid>,
        diesel::dsl::Eq<reviews::user_id, uuid::Uuid>,
    >,
> {
    reviews::table.filter(
        reviews::id
            .eq(*filter.id.as_uuid())
            .and(reviews::user_id.eq(*filter.owner.as_uuid())),
    )
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list_by_institution(
        &self,
        institution: &InstitutionId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ReviewRepositoryError::connection))?;
        let rows = reviews::table
            .filter(reviews::institution_id.eq(institution.as_uuid()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_reviews(rows)
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ReviewRepositoryError::connection))?;
        let rows = reviews::table
            .filter(reviews::user_id.eq(user.as_uuid()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_reviews(rows)
    }

    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ReviewRepositoryError::connection))?;
        let new_row = NewReviewRow {
            id: *review.id.as_uuid(),
            rating: i16::from(review.rating),
            comment: &review.comment,
            user_id: *review.user.as_uuid(),
            institution_id: *review.institution.as_uuid(),
            images: review.images.clone(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        };
        diesel::insert_into(reviews::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_owned(
        &self,
        filter: OwnedBy<ReviewId>,
        patch: &ReviewPatch,
        images: &[String],
        now: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ReviewRepositoryError::connection))?;
        let changeset = ReviewUpdate {
            rating: patch.rating.map(i16::from),
            comment: patch.comment.as_deref(),
            updated_at: now,
        };
        let row = diesel::update(owned(filter))
            .set((
                changeset,
                reviews::images.eq(reviews::images.concat(images.to_vec())),
            ))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_review).transpose()
    }

    async fn delete_owned(
        &self,
        filter: OwnedBy<ReviewId>,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ReviewRepositoryError::connection))?;
        let row = diesel::delete(owned(filter))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_review).transpose()
    }
}
