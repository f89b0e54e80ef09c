//! Backend entry-point: reads settings, applies migrations, wires adapters
//! and serves the REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scholarlink::inbound::http::health::HealthState;
use scholarlink::outbound::persistence::{DbPool, run_pending_migrations};
use scholarlink::settings::Settings;
use server::{ServerConfig, build_ports, create_server};

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

    let settings = Settings::from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    info!(
        host = %settings.bind_host,
        port = settings.port,
        "starting scholarlink backend"
    );

    run_pending_migrations(&settings.database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(settings.pool_config())
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    let ports = build_ports(&settings, &pool)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_host.clone(), settings.port, ports);
    let server = create_server(health_state, config)?;
    server.await
}
