//! Driving ports for account use-cases: sign-up, login and self-service
//! profile management.
//!
//! Inbound adapters call these without knowing how credentials are stored or
//! hashed, so HTTP handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{AccountPatch, Error, LoginCredentials, Registration, User, UserId};

/// A freshly issued bearer token together with the user it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign it in. Taken emails are rejected.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Exchange credentials for a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Update `target` when it is the caller's own account.
    async fn update(
        &self,
        actor: &UserId,
        target: &UserId,
        patch: AccountPatch,
    ) -> Result<User, Error>;

    /// Delete `target` (and everything it owns) when it is the caller's own
    /// account.
    async fn delete(&self, actor: &UserId, target: &UserId) -> Result<(), Error>;
}

#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// The caller's own record. A token for a deleted user yields 401.
    async fn profile(&self, actor: &UserId) -> Result<User, Error>;

    /// Any user's public record.
    async fn get(&self, id: &UserId) -> Result<User, Error>;
}
