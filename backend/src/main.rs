//! Backend entry-point: loads settings, prepares storage, and serves the portal.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal::inbound::http::health::HealthState;
use portal::inbound::http::session_config::{BuildMode, SessionSettings};
use portal::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{PortalSettings, ServerConfig, create_server};

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

    let settings = PortalSettings::load().wrap_err("loading portal settings")?;
    let session = SessionSettings::from_env(&mockable::DefaultEnv::new(), BuildMode::current())
        .wrap_err("loading session settings")?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let mut config = ServerConfig::new(session, settings.bind_addr());
    match settings.database_url.as_deref() {
        Some(database_url) => {
            if settings.skip_migrations {
                info!("skipping migrations");
            } else {
                run_migrations(database_url)
                    .await
                    .wrap_err("applying migrations")?;
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
            )
            .await
            .wrap_err("building database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; accounts are kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("starting HTTP server")?;
    info!(addr = %settings.bind_addr(), "portal listening");
    server.await.wrap_err("serving HTTP")
}
