//! Lifelog server entry-point: loads settings, prepares storage and serves
//! the REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lifelog_backend::inbound::http::health::HealthState;
use lifelog_backend::outbound::persistence::{DbPool, run_migrations};
use lifelog_backend::settings::{ServerSettings, auth_settings_from_env};
use server::{ServerConfig, create_server};

#[cfg(test)]
mod tests;

/// Apply pending migrations and open the pool when a database is configured.
async fn connect_storage(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(config) = settings.pool_config() else {
        return Ok(None);
    };
    run_migrations(config.database_url())
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let auth = auth_settings_from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address: {e}"),
        )
    })?;

    let mut config = ServerConfig::new(bind_addr, auth);
    if let Some(pool) = connect_storage(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "lifelog server listening");
    server.await
}
