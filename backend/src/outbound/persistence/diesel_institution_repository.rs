//! PostgreSQL-backed `InstitutionRepository` implementation.
//!
//! Owner-scoped mutations compile to a single
//! `UPDATE/DELETE ... WHERE id = $1 AND added_by = $2 RETURNING *`, so the
//! ownership check and the write cannot be separated by another request.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InstitutionRepository, InstitutionRepositoryError};
use crate::domain::{Institution, InstitutionId, InstitutionPatch, OwnedBy, UserId};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{InstitutionRow, InstitutionUpdate, NewInstitutionRow};
use super::pool::DbPool;
use super::schema::institutions;

/// Diesel-backed institution repository.
#[derive(Clone)]
pub struct DieselInstitutionRepository {
    pool: DbPool,
}

impl DieselInstitutionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> InstitutionRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => InstitutionRepositoryError::connection(message),
        StoreFailure::Query(message)
        | StoreFailure::UniqueViolation(message)
        | StoreFailure::ForeignKeyViolation(message) => InstitutionRepositoryError::query(message),
    }
}

fn row_to_institution(row: InstitutionRow) -> Institution {
    Institution {
        id: InstitutionId::from_uuid(row.id),
        name: row.name,
        location: row.location,
        description: row.description,
        owner: row.owner_id.map(UserId::from_uuid),
        added_by: UserId::from_uuid(row.added_by),
        images: row.images,
    }
}

fn owned(
    filter: OwnedBy<InstitutionId>,
) -> diesel::dsl::Filter<
    institutions::table,
    diesel::dsl::And<
        diesel::dsl::Eq<institutions::id, uuid::Uuid>,
        diesel::dsl::Eq<institutions::added_by, uuid::Uuid>,
    >,
> {
    institutions::table.filter(
        institutions::id
            .eq(*filter.id.as_uuid())
            .and(institutions::added_by.eq(*filter.owner.as_uuid())),
    )
}

#[async_trait]
impl InstitutionRepository for DieselInstitutionRepository {
    async fn list(&self) -> Result<Vec<Institution>, InstitutionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, InstitutionRepositoryError::connection))?;
        let rows = institutions::table
            .order((institutions::created_at.asc(), institutions::id.asc()))
            .select(InstitutionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_institution).collect())
    }

    async fn find_by_id(
        &self,
        id: &InstitutionId,
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, InstitutionRepositoryError::connection))?;
        let row = institutions::table
            .find(id.as_uuid())
            .select(InstitutionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_institution))
    }

    async fn create(&self, institution: &Institution) -> Result<(), InstitutionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, InstitutionRepositoryError::connection))?;
        let new_row = NewInstitutionRow {
            id: *institution.id.as_uuid(),
            name: &institution.name,
            location: &institution.location,
            description: &institution.description,
            owner_id: institution.owner.map(|owner| *owner.as_uuid()),
            added_by: *institution.added_by.as_uuid(),
            images: institution.images.clone(),
        };
        diesel::insert_into(institutions::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
        patch: &InstitutionPatch,
        images: &[String],
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, InstitutionRepositoryError::connection))?;
        let changeset = InstitutionUpdate {
            name: patch.name.as_deref(),
            location: patch.location.as_deref(),
            description: patch.description.as_deref(),
            owner_id: patch.owner.map(|owner| *owner.as_uuid()),
        };
        let row = diesel::update(owned(filter))
            .set((
                changeset,
                institutions::images.eq(institutions::images.concat(images.to_vec())),
            ))
            .returning(InstitutionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_institution))
    }

    async fn delete_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, InstitutionRepositoryError::connection))?;
        let row = diesel::delete(owned(filter))
            .returning(InstitutionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_institution))
    }
}
