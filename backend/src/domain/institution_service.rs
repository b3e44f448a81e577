//! Institution service implementing the institution driving ports.
//!
//! Creates stamp `added_by` from the verified identity. Updates and deletes
//! go through one owner-filtered store call, so a miss is reported the same
//! way whether the record is absent or belongs to someone else.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ownership::INSTITUTION;
use crate::domain::ports::{
    CreateInstitutionRequest, ImageUploader, InstitutionCommand, InstitutionQuery,
    InstitutionRepository, InstitutionRepositoryError, UpdateInstitutionRequest, UserRepository,
};
use crate::domain::service_support::{require_actor, upload_images, warn_if_orphaned};
use crate::domain::{Error, Institution, InstitutionId, OwnedBy, UserId};

/// Institution commands and queries over a repository, the user store and
/// an image host.
#[derive(Clone)]
pub struct InstitutionService<I, U> {
    institutions: Arc<I>,
    users: Arc<U>,
    uploader: Arc<dyn ImageUploader>,
}

impl<I, U> InstitutionService<I, U> {
    /// Create a new service with the given repositories and uploader.
    pub fn new(institutions: Arc<I>, users: Arc<U>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            institutions,
            users,
            uploader,
        }
    }
}

pub(crate) fn map_institution_error(err: InstitutionRepositoryError) -> Error {
    let message = match err {
        InstitutionRepositoryError::Connection { message }
        | InstitutionRepositoryError::Query { message } => message,
    };
    error!(%message, "institution store failure");
    Error::internal(format!("institution repository error: {message}"))
}

#[async_trait]
impl<I, U> InstitutionCommand for InstitutionService<I, U>
where
    I: InstitutionRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateInstitutionRequest) -> Result<Institution, Error> {
        let CreateInstitutionRequest {
            actor,
            input,
            images,
        } = request;
        require_actor(self.users.as_ref(), &actor).await?;
        let images = upload_images(self.uploader.as_ref(), images).await?;

        let institution = Institution {
            id: InstitutionId::random(),
            name: input.name,
            location: input.location,
            description: input.description,
            owner: input.owner,
            added_by: actor,
            images,
        };
        let stored = self
            .institutions
            .create(&institution)
            .await
            .map_err(map_institution_error);
        warn_if_orphaned(stored, &institution.images)?;
        info!(institution_id = %institution.id, added_by = %actor, "institution created");
        Ok(institution)
    }

    async fn update(&self, request: UpdateInstitutionRequest) -> Result<Institution, Error> {
        let UpdateInstitutionRequest {
            actor,
            id,
            patch,
            images,
        } = request;
        let images = upload_images(self.uploader.as_ref(), images).await?;
        let updated = self
            .institutions
            .update_owned(OwnedBy::new(id, actor), &patch, &images)
            .await
            .map_err(map_institution_error)
            .and_then(|matched| INSTITUTION.require(matched));
        warn_if_orphaned(updated, &images)
    }

    async fn delete(&self, actor: &UserId, id: &InstitutionId) -> Result<(), Error> {
        let removed = self
            .institutions
            .delete_owned(OwnedBy::new(*id, *actor))
            .await
            .map_err(map_institution_error)?;
        INSTITUTION.require(removed)?;
        info!(institution_id = %id, "institution deleted");
        Ok(())
    }
}

#[async_trait]
impl<I, U> InstitutionQuery for InstitutionService<I, U>
where
    I: InstitutionRepository,
    U: UserRepository,
{
    async fn list(&self) -> Result<Vec<Institution>, Error> {
        self.institutions.list().await.map_err(map_institution_error)
    }

    async fn get(&self, id: &InstitutionId) -> Result<Institution, Error> {
        let found = self
            .institutions
            .find_by_id(id)
            .await
            .map_err(map_institution_error)?;
        INSTITUTION.require(found)
    }
}

#[cfg(test)]
#[path = "institution_service_tests.rs"]
mod tests;
