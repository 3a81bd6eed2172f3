//! Backend entry-point: loads settings, selects adapters and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use academy::domain::ports::PaymentGateway;
use academy::inbound::http::health::HealthState;
use academy::inbound::http::token_config::{BuildMode, token_settings_from_env};
use academy::outbound::payments::StripePaymentGateway;
use academy::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{AppSettings, ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let env = DefaultEnv::new();
    let token_settings = token_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %token_settings.fingerprint(),
        ttl_secs = token_settings.ttl().as_secs(),
        "token signing key loaded"
    );
    let tokens = token_settings.into_issuer(Arc::clone(&clock));

    let mut config = ServerConfig::new(bind_addr, tokens, clock)
        .with_enrollment_policy(settings.enrollment_policy());

    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url, &settings).await?);
    }
    if let Some(gateway) = build_payment_gateway(&settings)? {
        config = config.with_payment_gateway(gateway);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}

async fn connect_database(database_url: &str, settings: &AppSettings) -> std::io::Result<DbPool> {
    let migration_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    let pool_config = PoolConfig::new(database_url).with_max_size(settings.db_pool_max_size());
    DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)
}

fn build_payment_gateway(
    settings: &AppSettings,
) -> std::io::Result<Option<Arc<dyn PaymentGateway>>> {
    let Some(secret_key) = settings.stripe_secret_key() else {
        return Ok(None);
    };
    let base_url = settings.stripe_base_url().map_err(std::io::Error::other)?;
    let gateway = StripePaymentGateway::new(&base_url, secret_key, settings.payment_timeout())
        .map_err(std::io::Error::other)?;
    info!(base_url = %base_url, "using Stripe payment gateway");
    Ok(Some(Arc::new(gateway)))
}
