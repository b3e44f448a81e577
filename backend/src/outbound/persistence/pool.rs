//! `bb8` pool of `diesel-async` PostgreSQL connections shared by the
//! review, institution and user repositories.

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to build the pool or to lease a connection from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing for one database URL.
///
/// Idle connections are not pre-opened; the first requests after startup
/// pay the connect cost.
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: CHECKOUT_TIMEOUT,
        }
    }

    /// Cap concurrent connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }
}

// The URL may embed a password.
impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &"<redacted>")
            .field("max_size", &self.max_size)
            .field("checkout_timeout", &self.checkout_timeout)
            .finish()
    }
}

/// Cloneable handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool described by `config`.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when bb8 rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            checkout_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(max_size)
            .min_idle(None)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Lease a connection, waiting at most the checkout timeout.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] when no connection becomes available.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_defaults() {
        let config = PoolConfig::new("postgres://localhost/reviews");
        assert_eq!(config.max_size, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.checkout_timeout, CHECKOUT_TIMEOUT);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(25, 25)]
    fn max_size_is_at_least_one(#[case] requested: u32, #[case] expected: u32) {
        let config = PoolConfig::new("postgres://localhost/reviews").with_max_size(requested);
        assert_eq!(config.max_size, expected);
    }

    #[rstest]
    fn debug_output_hides_the_url() {
        let config = PoolConfig::new("postgres://app:hunter2@db/reviews")
            .with_checkout_timeout(Duration::from_secs(5));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("5s"));
    }

    #[rstest]
    fn errors_render_their_message() {
        assert_eq!(
            PoolError::checkout("timed out").to_string(),
            "failed to get connection from pool: timed out"
        );
        assert_eq!(
            PoolError::build("invalid URL").to_string(),
            "failed to build connection pool: invalid URL"
        );
    }
}
