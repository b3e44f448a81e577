//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::TokenService;
use backend::domain::ports::ImageUploader;
use backend::inbound::http::health::HealthState;
use backend::outbound::media::{CloudinaryUploader, UnconfiguredUploader};
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{AppDependencies, ServerSettings, SharedDeps, build_http_state, create_server};

const UPLOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("load server settings")?;
    let bind_addr = settings.bind_addr()?;
    let secret = settings.token_secret()?;
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(TokenService::new(&secret, settings.token_ttl(), clock.clone()));

    let uploader: Arc<dyn ImageUploader> = match settings.cloudinary() {
        Some(credentials) => Arc::new(
            CloudinaryUploader::new(credentials, UPLOAD_TIMEOUT, clock)
                .wrap_err("build image uploader")?,
        ),
        None => {
            warn!("cloudinary credentials unset; image uploads will fail");
            Arc::new(UnconfiguredUploader)
        }
    };

    let pool = match settings.database_url.as_deref() {
        Some(url) => {
            run_migrations(url).await.wrap_err("apply migrations")?;
            let mut config = PoolConfig::new(url);
            if let Some(max) = settings.db_max_connections {
                config = config.with_max_size(max);
            }
            Some(DbPool::new(config).await.wrap_err("connect to database")?)
        }
        None => {
            warn!("REVIEWS_DATABASE_URL unset; records are kept in memory only");
            None
        }
    };

    let http_state = build_http_state(pool.as_ref(), SharedDeps::new(tokens.clone(), uploader));
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        tokens: web::Data::from(tokens),
    };

    info!(%bind_addr, persistent = pool.is_some(), "starting server");
    create_server(deps, bind_addr)?.await?;
    Ok(())
}
