//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! policy board test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built policy rows with known ranking
//! - `builders`: Builder for policy rows with realistic defaults
//! - `database`: PostgreSQL test container with the listing schema
//! - `assertions`: Ranking and page assertions
//! - `generators`: Property-based test data generators
//! - `logs`: Capture of tracing events for asserting log side effects

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod logs;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use logs::*;
