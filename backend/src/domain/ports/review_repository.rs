//! Port for review persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{InstitutionId, OwnedBy, Review, ReviewId, ReviewPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
        /// The referenced institution or author no longer exists.
        MissingReference { message: String } =>
            "review references a missing record: {message}",
    }
}

/// Review store. Listings are ordered newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list_by_institution(
        &self,
        institution: &InstitutionId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Persist a fully built record.
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Atomically apply `patch`, append `images` and stamp `now` when the
    /// filter matches.
    async fn update_owned(
        &self,
        filter: OwnedBy<ReviewId>,
        patch: &ReviewPatch,
        images: &[String],
        now: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Atomically remove the record when the filter matches.
    async fn delete_owned(
        &self,
        filter: OwnedBy<ReviewId>,
    ) -> Result<Option<Review>, ReviewRepositoryError>;
}
