//! Policy Listing Domain
//!
//! This crate implements the page data loader for the policy board: it asks
//! the listing store for every row of the `policy_with_popularity` view in
//! popularity order and hands the rows to the rendering layer under the key
//! `policies`.
//!
//! # Architecture
//!
//! The domain depends only on the [`PolicyListingPort`] trait:
//! - **Records**: [`PolicyRecord`] keeps each row exactly as the store sent it
//! - **Ranking**: an in-memory replica of the store's `ORDER BY` semantics
//! - **Loader**: [`PolicyPageLoader`] with a configurable [`FailureMode`]
//! - **Adapters**: the hosted REST adapter; the PostgreSQL adapter lives in `infra_db`
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{FailureMode, PolicyPageLoader};
//!
//! let loader = PolicyPageLoader::new(port, FailureMode::EmptyOnError);
//! let page = loader.load(None).await?;
//! println!("{} policies", page.policies.len());
//! ```

pub mod record;
pub mod ranking;
pub mod ports;
pub mod loader;
pub mod adapters;
pub mod error;

pub use record::{PolicyRecord, columns};
pub use ranking::{compare_records, rank, is_ranked};
pub use ports::PolicyListingPort;
pub use loader::{PolicyPageLoader, PolicyPage, FailureMode, POLICY_VIEW};
pub use adapters::{HostedRestAdapter, HostedRestConfig};
pub use error::PolicyError;
