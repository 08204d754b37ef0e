//! Page data loader
//!
//! On each page request the loader reads every row of the listing view in
//! [`POPULARITY_ORDER`] and returns them under `policies`. It takes no
//! caller input: no pagination, filtering or query parameters.
//!
//! # Failure handling
//!
//! A failed read is always logged. What happens next depends on the
//! [`FailureMode`]:
//!
//! - [`FailureMode::EmptyOnError`] returns an empty page so the page still
//!   renders. This is the historical behavior and the default.
//! - [`FailureMode::Propagate`] returns the error so the caller can surface it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use core_kernel::{HealthCheckResult, OperationMetadata, POPULARITY_ORDER};

use crate::error::PolicyError;
use crate::ports::PolicyListingPort;
use crate::record::PolicyRecord;

/// View the listing page reads from
pub const POLICY_VIEW: &str = "policy_with_popularity";

/// What the loader does when the store cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Log the error and return an empty page
    #[default]
    #[serde(rename = "empty")]
    EmptyOnError,
    /// Log the error and return it to the caller
    Propagate,
}

/// Data handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyPage {
    pub policies: Vec<PolicyRecord>,
}

impl PolicyPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Loads the policy listing page
pub struct PolicyPageLoader {
    port: Arc<dyn PolicyListingPort>,
    view: String,
    failure_mode: FailureMode,
}

impl PolicyPageLoader {
    /// Creates a loader reading [`POLICY_VIEW`] through `port`
    pub fn new(port: Arc<dyn PolicyListingPort>, failure_mode: FailureMode) -> Self {
        Self {
            port,
            view: POLICY_VIEW.to_string(),
            failure_mode,
        }
    }

    /// Reads from another view with the same columns
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Loads every policy in popularity order
    ///
    /// Rows are returned exactly as the store sent them.
    ///
    /// # Errors
    ///
    /// Only in [`FailureMode::Propagate`]: returns `PolicyError::Listing`
    /// when the store cannot be read.
    pub async fn load(&self, metadata: Option<OperationMetadata>) -> Result<PolicyPage, PolicyError> {
        let correlation_id = metadata
            .as_ref()
            .and_then(|m| m.correlation_id.clone())
            .unwrap_or_default();

        match self.port.fetch_ordered(&self.view, POPULARITY_ORDER, metadata).await {
            Ok(policies) => {
                debug!(
                    view = %self.view,
                    count = policies.len(),
                    correlation_id = %correlation_id,
                    "Fetched policies"
                );
                Ok(PolicyPage { policies })
            }
            Err(err) => {
                error!(
                    error = %err,
                    kind = err.kind(),
                    view = %self.view,
                    correlation_id = %correlation_id,
                    "Error fetching policies"
                );
                match self.failure_mode {
                    FailureMode::EmptyOnError => Ok(PolicyPage::empty()),
                    FailureMode::Propagate => Err(PolicyError::Listing(err)),
                }
            }
        }
    }

    /// Health of the underlying store
    pub async fn health(&self) -> HealthCheckResult {
        self.port.health_check().await
    }
}
