//! Policy listing adapters
//!
//! This module provides the adapter for the hosted database-as-a-service.
//! The direct PostgreSQL adapter lives in `infra_db`, next to the pool it
//! depends on.

pub mod hosted_rest;

pub use hosted_rest::{HostedRestAdapter, HostedRestConfig};
