//! Driving ports for institution use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Institution, InstitutionId, InstitutionPatch, NewInstitution, UserId};

use super::ImageFile;

/// Request to create an institution on behalf of `actor`.
#[derive(Debug, Clone)]
pub struct CreateInstitutionRequest {
    pub actor: UserId,
    pub input: NewInstitution,
    pub images: Vec<ImageFile>,
}

/// Request to patch an institution the actor added.
#[derive(Debug, Clone)]
pub struct UpdateInstitutionRequest {
    pub actor: UserId,
    pub id: InstitutionId,
    pub patch: InstitutionPatch,
    pub images: Vec<ImageFile>,
}

#[async_trait]
pub trait InstitutionCommand: Send + Sync {
    async fn create(&self, request: CreateInstitutionRequest) -> Result<Institution, Error>;

    /// Apply the patch; 404 when the record is absent or added by someone
    /// else.
    async fn update(&self, request: UpdateInstitutionRequest) -> Result<Institution, Error>;

    /// Remove the record; 404 when it is absent or added by someone else.
    async fn delete(&self, actor: &UserId, id: &InstitutionId) -> Result<(), Error>;
}

#[async_trait]
pub trait InstitutionQuery: Send + Sync {
    async fn list(&self) -> Result<Vec<Institution>, Error>;

    async fn get(&self, id: &InstitutionId) -> Result<Institution, Error>;
}
