//! Valex API Server
//!
//! Main entry point for the Valex backend service. Owns process-wide
//! resources: configuration, the database pool, the JWT service, and the
//! rate resolver; everything downstream receives handles.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valex_api::{AppState, create_router};
use valex_db::connect_pool;
use valex_rates::RateResolver;
use valex_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valex=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_pool(&config.database).await?;
    info!("Connected to database");

    // Create JWT service
    #[allow(clippy::cast_possible_wrap)]
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expiry_secs: config.jwt.access_token_expiry_secs as i64,
    });

    // Create rate resolver with the default provider chain
    let rates = RateResolver::from_config(&config.rates)
        .context("Failed to build rate providers")?;
    info!(
        provider_timeout_secs = config.rates.provider_timeout_secs,
        price_cache_ttl_secs = config.rates.price_cache_ttl_secs,
        "Rate resolver configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        rates: Arc::new(rates),
        exchange: Arc::new(config.exchange.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
