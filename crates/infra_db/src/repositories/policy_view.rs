//! Listing view repository
//!
//! Reads whole rows of a listing view as JSON objects so every column the
//! view exposes reaches the caller without a fixed row struct.

use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::ordering::is_qualified_identifier;
use core_kernel::OrderBy;

use crate::error::DatabaseError;

/// Repository reading listing views in a requested order
///
/// # Example
///
/// ```rust,ignore
/// use core_kernel::POPULARITY_ORDER;
/// use infra_db::repositories::PolicyViewRepository;
///
/// let repo = PolicyViewRepository::new(pool);
/// let rows = repo.fetch_ordered("policy_with_popularity", &POPULARITY_ORDER).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyViewRepository {
    pool: PgPool,
}

impl PolicyViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Builds the listing query for `view`
    ///
    /// Identifiers cannot be bound as parameters, so the view name and the
    /// order's columns are validated before they are spliced into the SQL.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidIdentifier` for a view or column that
    /// is not a plain (optionally schema-qualified) identifier, or an empty order.
    pub fn listing_query(view: &str, order: &OrderBy) -> Result<String, DatabaseError> {
        if !is_qualified_identifier(view) {
            return Err(DatabaseError::InvalidIdentifier(view.to_string()));
        }
        let order_clause = order
            .to_sql()
            .map_err(|e| DatabaseError::InvalidIdentifier(e.to_string()))?;

        Ok(format!(
            "SELECT row_to_json(v) FROM {} v ORDER BY {}",
            view, order_clause
        ))
    }

    /// Fetches every row of `view`, ordered by the database
    #[instrument(skip(self))]
    pub async fn fetch_ordered(&self, view: &str, order: &OrderBy) -> Result<Vec<Value>, DatabaseError> {
        let sql = Self::listing_query(view, order)?;

        let rows = sqlx::query_scalar::<_, Value>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        debug!(count = rows.len(), "Fetched listing rows");
        Ok(rows)
    }
}
