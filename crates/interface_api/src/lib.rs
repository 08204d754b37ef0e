//! HTTP API Layer
//!
//! This crate serves the policy board's page data over HTTP using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: page data, liveness and readiness
//! - **Middleware**: request ids, tracing, request logging, CORS
//! - **Error Handling**: consistent JSON error responses
//! - **Wiring**: [`build_listing_port`] picks the adapter named by the configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_policy::{HostedRestAdapter, HostedRestConfig, PolicyListingPort, PolicyPageLoader};
use infra_db::{create_pool, DatabaseConfig, PgPolicyListingAdapter};

use crate::config::{ApiConfig, DataSource};
use crate::error::StartupError;
use crate::handlers::{health, policy};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<PolicyPageLoader>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(loader: PolicyPageLoader, config: ApiConfig) -> Self {
        Self {
            loader: Arc::new(loader),
            config: Arc::new(config),
        }
    }

    /// Validates the configuration and builds the loader over the configured store
    pub fn from_config(config: ApiConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let port = build_listing_port(&config)?;
        let loader = PolicyPageLoader::new(port, config.on_error).with_view(config.view_name.clone());
        Ok(Self::new(loader, config))
    }
}

/// Creates the adapter for the configured data source
///
/// # Errors
///
/// Returns `StartupError::Config` when a required setting is missing, or
/// the adapter's own error when it cannot be constructed.
pub fn build_listing_port(config: &ApiConfig) -> Result<Arc<dyn PolicyListingPort>, StartupError> {
    let missing = |name: &str| {
        StartupError::Config(::config::ConfigError::NotFound(name.to_string()))
    };

    match config.data_source {
        DataSource::HostedRest => {
            let url = config.hosted_url.as_deref().ok_or_else(|| missing("hosted_url"))?;
            let key = config
                .hosted_api_key
                .as_deref()
                .ok_or_else(|| missing("hosted_api_key"))?;

            let mut rest = HostedRestConfig::new(url, key).with_view(config.view_name.clone());
            if let Some(schema) = &config.hosted_schema {
                rest = rest.with_schema(schema.clone());
            }
            if let Some(secs) = config.request_timeout_secs {
                rest = rest.with_timeout_secs(secs);
            }
            Ok(Arc::new(HostedRestAdapter::new(rest)?))
        }
        DataSource::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| missing("database_url"))?;

            let mut database = DatabaseConfig::new(url).max_connections(config.max_connections);
            if let Some(secs) = config.request_timeout_secs {
                database = database.acquire_timeout(Duration::from_secs(secs));
            }
            Ok(Arc::new(PgPolicyListingAdapter::new(create_pool(database)?)))
        }
    }
}

/// Creates the main API router
///
/// Page data is served at `/` and `/api/v1/policies`.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/policies", get(policy::page_data));

    Router::new()
        .route("/", get(policy::page_data))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .fallback(health::not_found)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
