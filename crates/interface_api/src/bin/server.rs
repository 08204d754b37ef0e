//! Policy Board - API Server Binary
//!
//! Serves the policy listing's page data over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Read from the hosted REST layer
//! PUBLIC_SUPABASE_URL=https://project.example.co PUBLIC_SUPABASE_ANON_KEY=... cargo run --bin policy-board
//!
//! # Read from PostgreSQL directly
//! API_DATA_SOURCE=postgres API_DATABASE_URL=postgres://... cargo run --bin policy-board
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level or filter directives (default: info; `RUST_LOG` wins)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_DATA_SOURCE` - `hosted_rest` or `postgres` (default: hosted_rest)
//! * `API_HOSTED_URL` / `API_HOSTED_API_KEY` / `API_HOSTED_SCHEMA` - hosted REST settings
//! * `API_DATABASE_URL` / `API_MAX_CONNECTIONS` - PostgreSQL settings
//! * `API_REQUEST_TIMEOUT_SECS` - Upper bound for one store read
//! * `API_VIEW_NAME` - Listing view (default: policy_with_popularity)
//! * `API_ON_ERROR` - `empty` or `propagate` (default: empty)

use anyhow::Context;
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Loads configuration, initializes logging, wires the listing store and
/// starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_source = ?config.data_source,
        view = %config.view_name,
        on_error = ?config.on_error,
        "Starting policy board API server"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let state = AppState::from_config(config).context("failed to initialize application")?;

    let health = state.loader.health().await;
    if health.status.is_operational() {
        tracing::info!(adapter = %health.adapter_id, latency_ms = health.latency_ms, "Listing store reachable");
    } else {
        tracing::warn!(
            adapter = %health.adapter_id,
            message = health.message.as_deref().unwrap_or_default(),
            "Listing store not reachable at startup"
        );
    }

    let app = create_router(state);

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
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
