//! Policy Billing - API Server Binary
//!
//! This binary starts the HTTP API server for policy accounting.
//!
//! # Usage
//!
//! ```bash
//! # Run against the in-memory store with demo data
//! API_SEED_DEMO_DATA=true cargo run --bin billing-api
//!
//! # Run against PostgreSQL
//! API_DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string; in-memory store when unset
//! * `API_DB_MAX_CONNECTIONS` - Pool ceiling (default: 10)
//! * `API_DB_MIN_CONNECTIONS` - Connections kept open (default: 2)
//! * `API_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a pooled connection (default: 30)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_TIMEZONE` - IANA timezone that decides "today" (default: UTC)
//! * `API_SEED_DEMO_DATA` - Load the demo book of business (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_billing::{AccountingStore, InMemoryAccountingStore};
use infra_db::{create_pool, run_migrations, PostgresAccountingStore};
use interface_api::{config::ApiConfig, create_router, seed::seed_demo_data, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the accounting store,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load API_* configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Policy Billing API Server"
    );

    let timezone = config.timezone().context("invalid API_TIMEZONE")?;
    let store = open_store(&config).await?;

    if config.seed_demo_data {
        let summary = seed_demo_data(store.clone())
            .await
            .context("failed to seed demo data")?;
        tracing::info!(policies = summary.policies.len(), "Seeded demo data");
    }

    let app = create_router(AppState::new(store, timezone));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Opens PostgreSQL when a database URL is configured, otherwise an
/// in-memory store that lives as long as the process.
async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn AccountingStore>> {
    match config.database() {
        Some(database) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(database)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("failed to run database migrations")?;
            Ok(Arc::new(PostgresAccountingStore::new(pool)))
        }
        None => {
            tracing::warn!("API_DATABASE_URL not set; using the in-memory store");
            Ok(Arc::new(InMemoryAccountingStore::new()))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
