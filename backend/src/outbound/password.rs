//! Argon2id password hashing adapter.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// Salted Argon2id hasher producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Hasher with the `argon2` crate's default costs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit cost parameters, e.g. cheaper ones in tests.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let params = self.params.clone();
        let password = password.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.expose().as_bytes(), &salt)
                .map(|digest| PasswordHash::new(digest.to_string()))
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
        .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }

    async fn matches(
        &self,
        password: &Password,
        digest: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let params = self.params.clone();
        let password = password.clone();
        let digest = digest.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PhcHash::new(digest.as_str())
                .map_err(|err| PasswordHashError::invalid_digest(err.to_string()))?;
            Ok(Self::argon2(params)
                .verify_password(password.expose().as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }
}
