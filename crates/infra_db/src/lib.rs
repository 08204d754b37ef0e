//! Infrastructure Database Layer
//!
//! This crate reads the policy board's listing views straight from
//! PostgreSQL using SQLx, as an alternative to the hosted REST layer.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories`] owns the SQL,
//! [`adapters`] implement the domain's `PolicyListingPort` on top of it and
//! translate database errors into port errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgPolicyListingAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/policy_board"))?;
//! let adapter = PgPolicyListingAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::PolicyViewRepository;
pub use adapters::PgPolicyListingAdapter;
