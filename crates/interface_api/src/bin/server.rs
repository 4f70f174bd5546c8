//! Auto Quote Engine - API Server Binary
//!
//! This binary starts the HTTP API server for auto insurance quoting.
//!
//! # Usage
//!
//! ```bash
//! # Run with the standard rate table and no known customers
//! cargo run --bin auto-quote-api
//!
//! # Run with a custom rate table and seeded customer history
//! API_RATING_CONFIG_PATH=rates.json API_CUSTOMER_DATA_PATH=customers.json cargo run --bin auto-quote-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_RATING_CONFIG_PATH` - JSON rate table (default: built-in standard table)
//! * `API_CUSTOMER_DATA_PATH` - JSON array of customer profiles (default: none)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_rating::{InMemoryCustomerHistory, QuoteService, RatingConfig};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, the rate table and customer
/// history, and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Auto Quote API Server"
    );

    let service = build_service(&config)?;
    tracing::info!(
        rating_version = %service.config().version,
        "Rate table loaded"
    );

    let app = create_router(AppState::new(service));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Builds the quote service from the configured rate table and customer data.
fn build_service(config: &ApiConfig) -> anyhow::Result<QuoteService> {
    let rating_config = match &config.rating_config_path {
        Some(path) => RatingConfig::from_path(path)
            .with_context(|| format!("cannot load rate table from {}", path))?,
        None => RatingConfig::default(),
    };

    let history = match &config.customer_data_path {
        Some(path) => {
            let history = InMemoryCustomerHistory::from_json_file(path)
                .with_context(|| format!("cannot load customer data from {}", path))?;
            tracing::info!(path = %path, "Customer history loaded");
            history
        }
        None => {
            tracing::warn!("No customer data configured, history discounts will not apply");
            InMemoryCustomerHistory::new()
        }
    };

    QuoteService::new(rating_config, Arc::new(history)).context("rate table rejected")
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
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
