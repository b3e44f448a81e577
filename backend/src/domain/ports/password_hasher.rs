//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing could not complete.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        InvalidDigest { message: String } => "stored password digest is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest of `password`.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a stored digest.
    async fn matches(
        &self,
        password: &Password,
        digest: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}
