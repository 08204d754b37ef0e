//! Policy domain errors
//!
//! This module defines the error types that can occur while loading the
//! policy listing.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The listing store could not be read
    #[error("Policy listing failed: {0}")]
    Listing(#[from] PortError),

    /// A row could not be represented as a policy record
    #[error("Invalid policy record: {0}")]
    InvalidRecord(String),
}

impl PolicyError {
    /// Creates an invalid record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        PolicyError::InvalidRecord(message.into())
    }

    /// Returns the underlying port error, if any
    pub fn port_error(&self) -> Option<&PortError> {
        match self {
            PolicyError::Listing(error) => Some(error),
            PolicyError::InvalidRecord(_) => None,
        }
    }
}
