//! Port abstraction for the credential store and its errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, NewUser, StoredUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Credential store.
///
/// Deleting a user also removes the institutions they added and the reviews
/// they wrote.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Insert a new user, failing with `DuplicateEmail` on a taken email.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Apply `changes` to the user with `id`, returning the updated record
    /// or `None` when no such user exists.
    async fn update_by_id(
        &self,
        id: &UserId,
        changes: &UserChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove the user with `id`, returning the removed record if any.
    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
