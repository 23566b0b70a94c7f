mod config;
mod db;
mod errors;
mod identity;
mod insights;
mod invalidation;
mod models;
mod onboarding;
mod routes;
mod state;
mod store;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::identity::HeaderIdentityResolver;
use crate::invalidation::RedisInvalidator;
use crate::onboarding::service::OnboardingService;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&db).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize Redis (cache invalidation fan-out to the web tier)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let invalidator = Arc::new(
        RedisInvalidator::connect(&redis, config.invalidation_channel.clone()).await?,
    );
    info!(
        "Redis invalidation client initialized (channel: {})",
        config.invalidation_channel
    );

    let identity_header = HeaderName::try_from(config.identity_header.as_str())
        .with_context(|| {
            format!(
                "IDENTITY_HEADER '{}' is not a valid header name",
                config.identity_header
            )
        })?;

    let onboarding_config = config.onboarding();
    info!(
        "Onboarding transaction timeout {:?}, insight refresh every {} days",
        onboarding_config.transaction_timeout, config.insight_refresh_days
    );

    // Build app state
    let state = AppState {
        store: store.clone(),
        identity: Arc::new(HeaderIdentityResolver::new(identity_header)),
        onboarding: OnboardingService::new(store, invalidator, onboarding_config),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
