//! In-process store implementing every repository port.
//!
//! All collections sit behind one mutex, so each port call (including the
//! owner-filtered update and delete) is a single critical section. Used when
//! no database URL is configured and by the HTTP behaviour tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    InstitutionRepository, InstitutionRepositoryError, ReviewRepository, ReviewRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Institution, InstitutionId, InstitutionPatch, NewUser, OwnedBy, Review, ReviewId,
    ReviewPatch, StoredUser, User, UserChanges, UserId,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<StoredUser>,
    institutions: Vec<Institution>,
    reviews: Vec<Review>,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<&UserId>) -> bool {
        self.users
            .iter()
            .any(|stored| &stored.user.email == email && Some(&stored.user.id) != except)
    }

    fn reviews_newest_first(&self, keep: impl Fn(&Review) -> bool) -> Vec<Review> {
        let mut matched: Vec<Review> = self
            .reviews
            .iter()
            .rev()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

/// Mutex-guarded store for users, institutions and reviews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|s| &s.user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|s| &s.user.id == id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.email_taken(&user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let created = User {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            verified: false,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        state.users.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: &UserId,
        changes: &UserChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(UserPersistenceError::duplicate_email(email.as_ref()));
            }
        }
        let Some(stored) = state.users.iter_mut().find(|s| &s.user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            stored.user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            stored.user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            stored.password_hash = hash.clone();
        }
        if !changes.is_empty() {
            stored.user.updated_at = now;
        }
        Ok(Some(stored.user.clone()))
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let Some(index) = state.users.iter().position(|s| &s.user.id == id) else {
            return Ok(None);
        };
        let removed = state.users.remove(index);
        let owned: Vec<InstitutionId> = state
            .institutions
            .iter()
            .filter(|i| &i.added_by == id)
            .map(|i| i.id)
            .collect();
        state.institutions.retain(|i| &i.added_by != id);
        state
            .reviews
            .retain(|r| &r.user != id && !owned.contains(&r.institution));
        Ok(Some(removed.user))
    }
}

#[async_trait]
impl InstitutionRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Institution>, InstitutionRepositoryError> {
        let state = self.lock().map_err(InstitutionRepositoryError::query)?;
        Ok(state.institutions.clone())
    }

    async fn find_by_id(
        &self,
        id: &InstitutionId,
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let state = self.lock().map_err(InstitutionRepositoryError::query)?;
        Ok(state.institutions.iter().find(|i| &i.id == id).cloned())
    }

    async fn create(&self, institution: &Institution) -> Result<(), InstitutionRepositoryError> {
        let mut state = self.lock().map_err(InstitutionRepositoryError::query)?;
        state.institutions.push(institution.clone());
        Ok(())
    }

    async fn update_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
        patch: &InstitutionPatch,
        images: &[String],
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let mut state = self.lock().map_err(InstitutionRepositoryError::query)?;
        let Some(institution) = state
            .institutions
            .iter_mut()
            .find(|i| i.id == filter.id && i.added_by == filter.owner)
        else {
            return Ok(None);
        };
        patch.apply(institution, images);
        Ok(Some(institution.clone()))
    }

    async fn delete_owned(
        &self,
        filter: OwnedBy<InstitutionId>,
    ) -> Result<Option<Institution>, InstitutionRepositoryError> {
        let mut state = self.lock().map_err(InstitutionRepositoryError::query)?;
        let Some(index) = state
            .institutions
            .iter()
            .position(|i| i.id == filter.id && i.added_by == filter.owner)
        else {
            return Ok(None);
        };
        let removed = state.institutions.remove(index);
        state.reviews.retain(|r| r.institution != removed.id);
        Ok(Some(removed))
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn list_by_institution(
        &self,
        institution: &InstitutionId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.lock().map_err(ReviewRepositoryError::query)?;
        Ok(state.reviews_newest_first(|r| &r.institution == institution))
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.lock().map_err(ReviewRepositoryError::query)?;
        Ok(state.reviews_newest_first(|r| &r.user == user))
    }

    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.lock().map_err(ReviewRepositoryError::query)?;
        if !state.institutions.iter().any(|i| i.id == review.institution) {
            return Err(ReviewRepositoryError::missing_reference(format!(
                "institution {}",
                review.institution
            )));
        }
        if !state.users.iter().any(|s| s.user.id == review.user) {
            return Err(ReviewRepositoryError::missing_reference(format!(
                "user {}",
                review.user
            )));
        }
        state.reviews.push(review.clone());
        Ok(())
    }

    async fn update_owned(
        &self,
        filter: OwnedBy<ReviewId>,
        patch: &ReviewPatch,
        images: &[String],
        now: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut state = self.lock().map_err(ReviewRepositoryError::query)?;
        let Some(review) = state
            .reviews
            .iter_mut()
            .find(|r| r.id == filter.id && r.user == filter.owner)
        else {
            return Ok(None);
        };
        patch.apply(review, images, now);
        Ok(Some(review.clone()))
    }

    async fn delete_owned(
        &self,
        filter: OwnedBy<ReviewId>,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut state = self.lock().map_err(ReviewRepositoryError::query)?;
        let Some(index) = state
            .reviews
            .iter()
            .position(|r| r.id == filter.id && r.user == filter.owner)
        else {
            return Ok(None);
        };
        Ok(Some(state.reviews.remove(index)))
    }
}
