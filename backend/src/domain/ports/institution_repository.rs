//! Port for institution persistence.
//!
//! Mutations of existing records only take an [`OwnedBy`] filter: the store
//! matches id and `added_by` in the same operation that writes, so there is
//! no window between an ownership check and the change.

use async_trait::async_trait;

use crate::domain::{Institution, InstitutionId, InstitutionPatch, OwnedBy};

use super::define_port_error;

define_port_error! {
    /// Errors raised by institution repository adapters.
    pub enum InstitutionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "institution repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "institution repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstitutionRepository: Send + Sync {
    /// All institutions in insertion order.
    async fn list(&self) -> Result<Vec<Institution>, InstitutionRepositoryError>;

    async fn find_by_id(
        &self,
        id: &InstitutionId,
    ) -> Result<Option<Institution>, InstitutionRepositoryError>;

    /// Persist a fully built record.
    async fn create(&self, institution: &Institution) -> Result<(), InstitutionRepositoryError>;

    /// Atomically apply `patch` and append `images` when the filter matches.
    async fn update_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
        patch: &InstitutionPatch,
        images: &[String],
    ) -> Result<Option<Institution>, InstitutionRepositoryError>;

    /// Atomically remove the record (and its reviews) when the filter matches.
    async fn delete_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
    ) -> Result<Option<Institution>, InstitutionRepositoryError>;
}
