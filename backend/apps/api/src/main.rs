//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use auth::{MemoryUserRepository, PgUserRepository};
use contact::{MemoryContactRequestRepository, PgContactRequestRepository};
use platform::monitoring::PrometheusCollector;
use platform::rate_limit::MemoryRateLimitStore;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{Services, build_router};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,contact=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let metrics = Arc::new(PrometheusCollector::new()?);

    // Expired windows are swept on the admission path
    let limiter = Arc::new(MemoryRateLimitStore::new());

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let services = Services {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                contacts: Arc::new(PgContactRequestRepository::new(pool)),
                limiter,
                metrics,
            };
            build_router(services, &config)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, data is kept in memory only");

            let services = Services {
                users: Arc::new(MemoryUserRepository::new()),
                contacts: Arc::new(MemoryContactRequestRepository::new()),
                limiter,
                metrics,
            };
            build_router(services, &config)
        }
    };

    // Start server
    tracing::info!(
        addr = %config.bind_addr,
        auth_limit = config.auth_rate_limit.max_requests,
        contact_limit = config.contact_rate_limit.max_requests,
        api_limit = config.api_rate_limit.max_requests,
        "Listening"
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
