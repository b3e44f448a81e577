//! Server settings loaded via OrthoConfig.
//!
//! Every field can be set with a `REVIEWS_`-prefixed environment variable,
//! a CLI flag or a config file.

use std::net::SocketAddr;
use std::time::Duration;

use backend::domain::DEFAULT_TOKEN_TTL;
use backend::outbound::media::CloudinaryCredentials;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEWS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours.
    pub token_ttl_hours: Option<u64>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
}

/// Settings that cannot be turned into a running server.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("REVIEWS_JWT_SECRET must be set")]
    MissingSecret,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured token lifetime, 24 hours when unset.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl_hours
            .map_or(DEFAULT_TOKEN_TTL, |hours| {
                Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR))
            })
    }

    /// Cloudinary credentials, present only when all three parts are set.
    pub fn cloudinary(&self) -> Option<CloudinaryCredentials> {
        match (
            &self.cloudinary_cloud_name,
            &self.cloudinary_api_key,
            &self.cloudinary_api_secret,
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryCredentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        }
    }

    /// The configured token secret.
    ///
    /// Debug builds fall back to a random per-process secret, so tokens die
    /// with the process. Release builds refuse to start without one.
    pub fn token_secret(&self) -> Result<Vec<u8>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
            Some(secret) => Ok(secret.as_bytes().to_vec()),
            None if cfg!(debug_assertions) => {
                tracing::warn!("REVIEWS_JWT_SECRET unset; using an ephemeral secret (dev only)");
                Ok(rand::random::<[u8; 32]>().to_vec())
            }
            None => Err(SettingsError::MissingSecret),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "REVIEWS_BIND_ADDR",
        "REVIEWS_DATABASE_URL",
        "REVIEWS_DB_MAX_CONNECTIONS",
        "REVIEWS_JWT_SECRET",
        "REVIEWS_TOKEN_TTL_HOURS",
        "REVIEWS_CLOUDINARY_CLOUD_NAME",
        "REVIEWS_CLOUDINARY_API_KEY",
        "REVIEWS_CLOUDINARY_API_SECRET",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket addr")
        );
        assert_eq!(settings.token_ttl(), DEFAULT_TOKEN_TTL);
        assert!(settings.database_url.is_none());
        assert!(settings.cloudinary().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("REVIEWS_BIND_ADDR", "127.0.0.1:9000"),
            ("REVIEWS_DATABASE_URL", "postgres://reviews@localhost/reviews"),
            ("REVIEWS_JWT_SECRET", "s3cret"),
            ("REVIEWS_TOKEN_TTL_HOURS", "2"),
            ("REVIEWS_CLOUDINARY_CLOUD_NAME", "demo"),
            ("REVIEWS_CLOUDINARY_API_KEY", "key"),
            ("REVIEWS_CLOUDINARY_API_SECRET", "shh"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://reviews@localhost/reviews")
        );
        assert_eq!(settings.token_ttl(), Duration::from_secs(7200));
        assert_eq!(settings.token_secret().expect("secret"), b"s3cret".to_vec());
        let creds = settings.cloudinary().expect("credentials");
        assert_eq!(creds.cloud_name, "demo");
    }

    #[rstest]
    fn partial_cloudinary_credentials_are_ignored() {
        let _guard = lock_env(env_with(&[("REVIEWS_CLOUDINARY_CLOUD_NAME", "demo")]));

        let settings = load_from_empty_args();
        assert!(settings.cloudinary().is_none());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(env_with(&[("REVIEWS_BIND_ADDR", "nowhere")]));

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("bad address");
        assert!(err.to_string().starts_with("invalid bind address \"nowhere\""));
    }

    #[cfg(debug_assertions)]
    #[rstest]
    fn debug_builds_generate_a_secret() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.token_secret().expect("secret").len(), 32);
    }
}
