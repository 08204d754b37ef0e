//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting domain interfaces
//! to the PostgreSQL database layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PgPolicyListingAdapter;
//! use domain_policy::{FailureMode, PolicyPageLoader};
//! use std::sync::Arc;
//!
//! let adapter = PgPolicyListingAdapter::new(pool);
//! let loader = PolicyPageLoader::new(Arc::new(adapter), FailureMode::EmptyOnError);
//! ```

pub mod policy_view;

pub use policy_view::PgPolicyListingAdapter;
