//! Core Kernel - Foundational types for the policy board
//!
//! This crate provides the building blocks shared by the domain, the
//! database layer and the HTTP surface:
//! - Sort orders that render to SQL and to the hosted REST dialect
//! - The unified port error and adapter health types

pub mod ordering;
pub mod ports;
pub mod error;

pub use ordering::{OrderBy, OrderTerm, SortDirection, NullPlacement, POPULARITY_ORDER};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    OperationMetadata,
};
pub use error::CoreError;
