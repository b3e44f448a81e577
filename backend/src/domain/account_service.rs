//! Account service implementing sign-up, login and self-service profile
//! management.
//!
//! Unknown emails and wrong passwords produce the same 401 so callers cannot
//! probe which accounts exist. Update and delete only act on the caller's
//! own id; any other id reads as "User not found".

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ownership::ACCOUNT;
use crate::domain::ports::{
    AccountCommand, AccountQuery, AuthSession, PasswordHashError, PasswordHasher, UserRepository,
};
use crate::domain::service_support::{USER_EXISTS, map_user_error, require_actor};
use crate::domain::{
    AccountPatch, Error, LoginCredentials, NewUser, Registration, TokenService, User, UserChanges,
    UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration, login and self-service account management.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new account service with the given user store, hasher and
    /// token issuer.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_hash_error(err: PasswordHashError) -> Error {
        error!(error = %err, "password hashing failed");
        Error::internal(format!("password hashing failed: {err}"))
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(|err| {
            error!(error = %err, "token signing failed");
            Error::internal(err.to_string())
        })?;
        Ok(AuthSession { token, user })
    }

    fn ensure_self(actor: &UserId, target: &UserId) -> Result<(), Error> {
        if actor == target {
            Ok(())
        } else {
            debug!(%actor, %target, "refusing to mutate another account");
            Err(Error::not_found(ACCOUNT.not_found))
        }
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            name,
            email,
            password,
        } = registration;

        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::invalid_request(USER_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(Self::map_hash_error)?;
        let new_user = NewUser {
            id: UserId::random(),
            name,
            email,
            password_hash,
            created_at: self.clock.utc(),
        };
        let user = self.users.create(&new_user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "user registered");
        self.session_for(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .matches(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            debug!(user_id = %stored.user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.session_for(stored.user)
    }

    async fn update(
        &self,
        actor: &UserId,
        target: &UserId,
        patch: AccountPatch,
    ) -> Result<User, Error> {
        Self::ensure_self(actor, target)?;
        let AccountPatch {
            name,
            email,
            password,
        } = patch;

        let password_hash = match password {
            Some(password) => Some(
                self.hasher
                    .hash(&password)
                    .await
                    .map_err(Self::map_hash_error)?,
            ),
            None => None,
        };
        let changes = UserChanges {
            name,
            email,
            password_hash,
        };
        let updated = self
            .users
            .update_by_id(target, &changes, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        ACCOUNT.require(updated)
    }

    async fn delete(&self, actor: &UserId, target: &UserId) -> Result<(), Error> {
        Self::ensure_self(actor, target)?;
        let removed = self
            .users
            .delete_by_id(target)
            .await
            .map_err(map_user_error)?;
        let user = ACCOUNT.require(removed)?;
        info!(user_id = %user.id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn profile(&self, actor: &UserId) -> Result<User, Error> {
        require_actor(self.users.as_ref(), actor)
            .await
            .map(|stored| stored.user)
    }

    async fn get(&self, id: &UserId) -> Result<User, Error> {
        let found = self.users.find_by_id(id).await.map_err(map_user_error)?;
        ACCOUNT.require(found.map(|stored| stored.user))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
