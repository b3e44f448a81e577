//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use argon2::Params;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{ImageFile, ImageUploadError, ImageUploader};
use crate::domain::{AccountService, InstitutionService, ReviewService, TokenService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::outbound::password::Argon2Hasher;

/// Signing secret shared by every test token service.
pub const TEST_TOKEN_SECRET: &[u8] = b"reviews-test-secret-0123456789abcdef";

/// Clock whose current instant only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Uploader that hands out predictable URLs, or fails every call when
/// built with [`StubUploader::failing`].
#[derive(Debug, Default)]
pub struct StubUploader {
    fail: bool,
    uploaded: Mutex<Vec<String>>,
}

impl StubUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            uploaded: Mutex::new(Vec::new()),
        }
    }

    /// File names received so far, in upload order.
    pub fn uploaded(&self) -> Vec<String> {
        match self.uploaded.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("uploader mutex"),
        }
    }
}

#[async_trait]
impl ImageUploader for StubUploader {
    async fn upload_all(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ImageUploadError> {
        if self.fail {
            return Err(ImageUploadError::rejected("stub uploader refuses every file"));
        }
        let mut uploaded = match self.uploaded.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("uploader mutex"),
        };
        Ok(files
            .into_iter()
            .map(|file| {
                uploaded.push(file.file_name.clone());
                format!("https://images.test/{}", file.file_name)
            })
            .collect())
    }
}

/// In-memory services wired the same way the server wires them.
///
/// Password hashing uses the cheapest Argon2 parameters so registration
/// stays fast.
pub struct TestServices {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<MutableClock>,
    pub uploader: Arc<StubUploader>,
    pub tokens: Arc<TokenService>,
    pub state: HttpState,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_uploader(StubUploader::default())
    }

    pub fn with_uploader(uploader: StubUploader) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let uploader = Arc::new(uploader);
        let tokens = Arc::new(TokenService::new(
            TEST_TOKEN_SECRET,
            Duration::from_secs(3600),
            clock.clone(),
        ));
        let hasher = Arc::new(Argon2Hasher::with_params(
            Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None).unwrap_or_default(),
        ));

        let accounts = Arc::new(AccountService::new(
            store.clone(),
            hasher,
            tokens.clone(),
            clock.clone(),
        ));
        let institutions = Arc::new(InstitutionService::new(
            store.clone(),
            store.clone(),
            uploader.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            uploader.clone(),
            clock.clone(),
        ));
        let state = HttpState::new(HttpStatePorts {
            accounts: accounts.clone(),
            accounts_query: accounts,
            institutions: institutions.clone(),
            institutions_query: institutions,
            reviews: reviews.clone(),
            reviews_query: reviews,
        });

        Self {
            store,
            clock,
            uploader,
            tokens,
            state,
        }
    }
}

impl Default for TestServices {
    fn default() -> Self {
        Self::new()
    }
}
