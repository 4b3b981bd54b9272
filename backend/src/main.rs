//! Clinic web server entry-point.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinica::config::{bind_addr_from_env, database_settings_from_env, session_settings_from_env};
use clinica::inbound::http::health::HealthState;
use clinica::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, create_server};

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

    let env = DefaultEnv::new();
    let database = database_settings_from_env(&env)?;
    let session = session_settings_from_env(&env)?;
    let bind_addr = bind_addr_from_env(&env)?;

    info!(
        database = %database.redacted_url(),
        %bind_addr,
        cookie_secure = session.cookie_secure,
        "starting clinic server"
    );
    if !session.cookie_secure {
        warn!("session cookies are not marked Secure; use only behind plain-HTTP development setups");
    }

    // Connections open on first use; an outage shows up on the login page.
    let pool = DbPool::lazy(&PoolConfig::new(database.url()));

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session.key, session.cookie_secure, bind_addr, pool);
    create_server(health_state, config)?.await
}
