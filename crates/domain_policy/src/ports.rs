//! Policy Listing Ports
//!
//! This module defines the port interface the loader reads policies through,
//! enabling swappable implementations (hosted REST layer, direct PostgreSQL,
//! mock).
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_policy::ports::PolicyListingPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PolicyListingPort> = match config.data_source {
//!     DataSource::HostedRest => Arc::new(HostedRestAdapter::new(rest_config)?),
//!     DataSource::Postgres => Arc::new(PgPolicyListingAdapter::new(pool)),
//! };
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, OrderBy, PortError};

use crate::record::PolicyRecord;

/// Read access to a listing view
#[async_trait]
pub trait PolicyListingPort: DomainPort + HealthCheckable {
    /// Fetches every row of `view`, ordered by the store according to `order`
    ///
    /// Implementations must not reorder, filter or edit the rows they
    /// receive from the store.
    async fn fetch_ordered(
        &self,
        view: &str,
        order: OrderBy,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<PolicyRecord>, PortError>;
}

/// In-memory implementation for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use tokio::sync::RwLock;

    use crate::ranking::rank;

    /// Failure a [`MockPolicyListingPort`] can be told to produce
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockFailure {
        Connection,
        Timeout,
        Unauthorized,
        RateLimited,
        ServiceUnavailable,
        Transformation,
        MissingView,
    }

    impl MockFailure {
        /// Every failure kind, for tests that must hold regardless of error type
        pub const ALL: [MockFailure; 7] = [
            MockFailure::Connection,
            MockFailure::Timeout,
            MockFailure::Unauthorized,
            MockFailure::RateLimited,
            MockFailure::ServiceUnavailable,
            MockFailure::Transformation,
            MockFailure::MissingView,
        ];

        fn to_error(self, view: &str) -> PortError {
            match self {
                MockFailure::Connection => PortError::connection("connection refused"),
                MockFailure::Timeout => PortError::Timeout {
                    operation: "fetch_ordered".to_string(),
                    duration_ms: 30_000,
                },
                MockFailure::Unauthorized => PortError::Unauthorized {
                    message: "invalid api key".to_string(),
                },
                MockFailure::RateLimited => PortError::RateLimited { retry_after_secs: 1 },
                MockFailure::ServiceUnavailable => PortError::ServiceUnavailable {
                    service: "mock store".to_string(),
                },
                MockFailure::Transformation => PortError::transformation("row is not an object"),
                MockFailure::MissingView => PortError::not_found("view", view),
            }
        }
    }

    /// A listing request as the mock received it
    #[derive(Debug, Clone, PartialEq)]
    pub struct ListingRequest {
        pub view: String,
        pub order: OrderBy,
        pub correlation_id: Option<String>,
    }

    /// Mock implementation of PolicyListingPort
    ///
    /// By default it ranks its rows the way the store would. Use
    /// [`MockPolicyListingPort::verbatim`] to return rows exactly as given.
    #[derive(Debug)]
    pub struct MockPolicyListingPort {
        records: RwLock<Vec<PolicyRecord>>,
        apply_order: bool,
        failure: RwLock<Option<MockFailure>>,
        health: RwLock<AdapterHealth>,
        requests: RwLock<Vec<ListingRequest>>,
    }

    impl Default for MockPolicyListingPort {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockPolicyListingPort {
        pub fn new() -> Self {
            Self::with_records(Vec::new())
        }

        /// Mock that ranks `records` by the requested order
        pub fn with_records(records: Vec<PolicyRecord>) -> Self {
            Self {
                records: RwLock::new(records),
                apply_order: true,
                failure: RwLock::new(None),
                health: RwLock::new(AdapterHealth::Healthy),
                requests: RwLock::new(Vec::new()),
            }
        }

        /// Mock that returns `records` in the given order, ignoring the request
        pub fn verbatim(records: Vec<PolicyRecord>) -> Self {
            Self {
                apply_order: false,
                ..Self::with_records(records)
            }
        }

        /// Mock whose every fetch fails with `failure`
        pub fn failing(failure: MockFailure) -> Self {
            Self {
                failure: RwLock::new(Some(failure)),
                ..Self::new()
            }
        }

        pub async fn set_failure(&self, failure: Option<MockFailure>) {
            *self.failure.write().await = failure;
        }

        pub async fn set_health(&self, health: AdapterHealth) {
            *self.health.write().await = health;
        }

        pub async fn set_records(&self, records: Vec<PolicyRecord>) {
            *self.records.write().await = records;
        }

        /// Requests received so far, oldest first
        pub async fn requests(&self) -> Vec<ListingRequest> {
            self.requests.read().await.clone()
        }
    }

    impl DomainPort for MockPolicyListingPort {}

    #[async_trait]
    impl HealthCheckable for MockPolicyListingPort {
        async fn health_check(&self) -> HealthCheckResult {
            let status = *self.health.read().await;
            HealthCheckResult {
                status,
                ..HealthCheckResult::healthy("mock-policy-listing", 0)
            }
        }
    }

    #[async_trait]
    impl PolicyListingPort for MockPolicyListingPort {
        async fn fetch_ordered(
            &self,
            view: &str,
            order: OrderBy,
            metadata: Option<OperationMetadata>,
        ) -> Result<Vec<PolicyRecord>, PortError> {
            self.requests.write().await.push(ListingRequest {
                view: view.to_string(),
                order,
                correlation_id: metadata.and_then(|m| m.correlation_id),
            });

            if let Some(failure) = *self.failure.read().await {
                return Err(failure.to_error(view));
            }

            let mut records = self.records.read().await.clone();
            if self.apply_order {
                rank(&mut records, &order);
            }
            Ok(records)
        }
    }
}
