//! Repository implementations
//!
//! Repositories encapsulate SQL queries and hand back rows in a form the
//! adapters can translate into domain types.

pub mod policy_view;

pub use policy_view::PolicyViewRepository;
