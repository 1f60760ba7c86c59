//! Users backend entry-point: loads settings, prepares storage, and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use users_backend::inbound::http::health::HealthState;
use users_backend::outbound::persistence::{DbPool, run_pending_migrations};
use ortho_config::OrthoConfig;
use users_backend::settings::AppSettings;

use server::{ServerConfig, create_server, drain_on_signal};

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
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err_with(|| format!("invalid bind host {:?}", settings.bind_host()))?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            apply_migrations(database_url.to_owned()).await?;
        }
        let pool = DbPool::new(settings.pool_config(database_url))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting users backend");
    let server =
        create_server(health_state.clone(), config).wrap_err("failed to start HTTP server")?;
    actix_web::rt::spawn(drain_on_signal(server.handle(), health_state));
    server.await.wrap_err("HTTP server terminated with an error")?;
    info!("users backend stopped");
    Ok(())
}

async fn apply_migrations(database_url: String) -> Result<()> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to apply migrations")?;
    if applied.is_empty() {
        info!("database schema is up to date");
    } else {
        info!(versions = ?applied, "applied migrations");
    }
    Ok(())
}
