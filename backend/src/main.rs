//! Backend entry-point: loads settings, prepares adapters and serves the REST
//! API.

mod server;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use recipe_backend::outbound::media::FsImageStore;
use recipe_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_async};
use recipe_backend::settings::AppSettings;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
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

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session settings")?;

    if settings.run_migrations {
        let applied = run_pending_migrations_async(settings.database_url().to_owned())
            .await
            .wrap_err("database migrations failed")?;
        info!(applied = applied.len(), "schema up to date");
    }

    let pool = DbPool::new(PoolConfig::from_settings(&settings))
        .await
        .wrap_err("failed to build database pool")?;
    let images = FsImageStore::open(settings.media_root(), settings.media_url_prefix())
        .wrap_err("failed to open media root")?;

    let http_state = build_http_state(&pool, images, Arc::new(DefaultClock));
    let config = ServerConfig::new(session, settings.bind_addr());
    info!(bind_addr = %config.bind_addr(), "starting HTTP server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, failing liveness while connections drain");
            health_state.mark_unhealthy();
        }
    });
    server.await?;
    Ok(())
}
