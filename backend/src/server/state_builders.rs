//! Builders for HTTP state from the configured store and uploader.

use std::sync::Arc;

use backend::domain::ports::{
    ImageUploader, InstitutionRepository, PasswordHasher, ReviewRepository, UserRepository,
};
use backend::domain::{AccountService, InstitutionService, ReviewService, TokenService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::outbound::password::Argon2Hasher;
use backend::outbound::persistence::{
    DbPool, DieselInstitutionRepository, DieselReviewRepository, DieselUserRepository,
};
use mockable::{Clock, DefaultClock};

/// Process-wide collaborators shared by every service.
#[derive(Clone)]
pub struct SharedDeps {
    pub tokens: Arc<TokenService>,
    pub uploader: Arc<dyn ImageUploader>,
    pub clock: Arc<dyn Clock>,
}

impl SharedDeps {
    pub fn new(tokens: Arc<TokenService>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            tokens,
            uploader,
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Wire services over one set of repositories.
fn wire<U, I, R, H>(
    users: Arc<U>,
    institutions: Arc<I>,
    reviews: Arc<R>,
    hasher: Arc<H>,
    deps: SharedDeps,
) -> HttpState
where
    U: UserRepository + 'static,
    I: InstitutionRepository + 'static,
    R: ReviewRepository + 'static,
    H: PasswordHasher + 'static,
{
    let SharedDeps {
        tokens,
        uploader,
        clock,
    } = deps;
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        hasher,
        tokens,
        clock.clone(),
    ));
    let institution_service = Arc::new(InstitutionService::new(
        institutions.clone(),
        users.clone(),
        uploader.clone(),
    ));
    let review_service = Arc::new(ReviewService::new(
        reviews,
        institutions,
        users,
        uploader,
        clock,
    ));

    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        institutions: institution_service.clone(),
        institutions_query: institution_service,
        reviews: review_service.clone(),
        reviews_query: review_service,
    })
}

/// HTTP state backed by PostgreSQL when a pool is configured, otherwise by
/// a process-local memory store.
pub fn build_http_state(pool: Option<&DbPool>, deps: SharedDeps) -> HttpState {
    let hasher = Arc::new(Argon2Hasher::new());
    match pool {
        Some(pool) => wire(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselInstitutionRepository::new(pool.clone())),
            Arc::new(DieselReviewRepository::new(pool.clone())),
            hasher,
            deps,
        ),
        None => {
            let store = Arc::new(MemoryStore::new());
            wire(store.clone(), store.clone(), store, hasher, deps)
        }
    }
}
