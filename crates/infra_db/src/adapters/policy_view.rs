//! PostgreSQL Policy Listing Adapter
//!
//! Implements `PolicyListingPort` over [`PolicyViewRepository`] for
//! deployments that reach the database directly instead of through the
//! hosted REST layer.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - Pool timeout -> `PortError::Timeout`
//! - Connection and I/O failures -> `PortError::Connection`
//! - Undefined relation (42P01) -> `PortError::NotFound`
//! - Rows that are not JSON objects -> `PortError::Transformation`
//! - Other errors -> `PortError::Internal`

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, OrderBy, PortError,
};
use domain_policy::{PolicyListingPort, PolicyRecord};

use crate::repositories::PolicyViewRepository;

const ADAPTER_ID: &str = "postgres-policy-listing-adapter";

/// PostgreSQL-backed implementation of the PolicyListingPort trait
#[derive(Debug, Clone)]
pub struct PgPolicyListingAdapter {
    repository: PolicyViewRepository,
}

impl PgPolicyListingAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PolicyViewRepository::new(pool),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PolicyViewRepository {
        &self.repository
    }
}

impl DomainPort for PgPolicyListingAdapter {}

#[async_trait]
impl HealthCheckable for PgPolicyListingAdapter {
    /// Runs `SELECT 1` to verify the pool can reach the database
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(
                ADAPTER_ID,
                latency_ms,
                format!("Database error: {}", e),
            ),
        }
    }
}

#[async_trait]
impl PolicyListingPort for PgPolicyListingAdapter {
    #[instrument(skip(self, metadata), fields(correlation_id))]
    async fn fetch_ordered(
        &self,
        view: &str,
        order: OrderBy,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<PolicyRecord>, PortError> {
        if let Some(id) = metadata.as_ref().and_then(|m| m.correlation_id.as_deref()) {
            tracing::Span::current().record("correlation_id", id);
        }

        let rows = self
            .repository
            .fetch_ordered(view, &order)
            .await
            .map_err(|e| e.into_port_error(view))?;

        rows.into_iter()
            .map(|row| {
                PolicyRecord::from_value(row).map_err(|e| {
                    PortError::transformation(format!("unexpected row in view {}: {}", view, e))
                })
            })
            .collect()
    }
}
