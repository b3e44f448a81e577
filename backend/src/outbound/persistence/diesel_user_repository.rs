//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Deleting a user relies on `ON DELETE CASCADE` to remove the institutions
//! they added and the reviews they wrote in the same statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordHash, StoredUser, User, UserChanges, UserId, UserName,
};

use super::diesel_basic_error_mapping::{StoreFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&Email>) -> UserPersistenceError {
    match classify_diesel_error(error) {
        StoreFailure::UniqueViolation(_) => UserPersistenceError::duplicate_email(
            email.map(AsRef::as_ref).unwrap_or_default(),
        ),
        StoreFailure::Connection(message) => UserPersistenceError::connection(message),
        StoreFailure::Query(message) | StoreFailure::ForeignKeyViolation(message) => {
            UserPersistenceError::query(message)
        }
    }
}

fn row_to_user(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let user = User {
        id: UserId::from_uuid(row.id),
        name: UserName::new(&row.name).map_err(corrupt)?,
        email: Email::new(&row.email).map_err(corrupt)?,
        verified: row.verified,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(StoredUser {
        user,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_user).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let new_row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(&user.email)))?;
        row_to_user(row).map(|stored| stored.user)
    }

    async fn update_by_id(
        &self,
        id: &UserId,
        changes: &UserChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        if changes.is_empty() {
            return self
                .find_by_id(id)
                .await
                .map(|found| found.map(|stored| stored.user));
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let changeset = UserUpdate {
            name: changes.name.as_ref().map(AsRef::as_ref),
            email: changes.email.as_ref().map(AsRef::as_ref),
            password_hash: changes.password_hash.as_ref().map(PasswordHash::as_str),
            updated_at: now,
        };
        let row = diesel::update(users::table.find(id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, changes.email.as_ref()))?;
        row.map(|row| row_to_user(row).map(|stored| stored.user))
            .transpose()
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;
        let row = diesel::delete(users::table.find(id.as_uuid()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(|row| row_to_user(row).map(|stored| stored.user))
            .transpose()
    }
}
