//! Sort orders for listing queries
//!
//! An [`OrderBy`] is an ordered list of [`OrderTerm`]s. The same order renders
//! to a SQL `ORDER BY` body for direct database access and to the `order`
//! query parameter understood by the hosted REST layer, so every adapter asks
//! the store for exactly the same ranking.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::POPULARITY_ORDER;
//!
//! assert_eq!(
//!     POPULARITY_ORDER.to_sql().unwrap(),
//!     "popularity_score DESC NULLS LAST, immediate_count DESC, next_count DESC, created_at DESC"
//! );
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::CoreError;

/// Direction of a single sort term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn sql_keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    fn rest_keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Where NULL values land relative to non-NULL values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPlacement {
    First,
    Last,
}

/// A single column in an ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderTerm {
    /// Column name, a plain SQL identifier
    pub column: &'static str,
    /// Sort direction
    pub direction: SortDirection,
    /// Explicit NULL placement; `None` leaves it to the store
    pub nulls: Option<NullPlacement>,
}

impl OrderTerm {
    /// Ascending term with the store's default NULL placement
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
            nulls: None,
        }
    }

    /// Descending term with the store's default NULL placement
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
            nulls: None,
        }
    }

    /// Places NULLs before all other values
    pub const fn nulls_first(self) -> Self {
        Self {
            column: self.column,
            direction: self.direction,
            nulls: Some(NullPlacement::First),
        }
    }

    /// Places NULLs after all other values
    pub const fn nulls_last(self) -> Self {
        Self {
            column: self.column,
            direction: self.direction,
            nulls: Some(NullPlacement::Last),
        }
    }

    /// Resolves the NULL placement the store will actually apply.
    ///
    /// PostgreSQL treats NULL as larger than every value, so an unset
    /// placement means last for ascending and first for descending.
    pub fn effective_nulls(&self) -> NullPlacement {
        match (self.nulls, self.direction) {
            (Some(placement), _) => placement,
            (None, SortDirection::Ascending) => NullPlacement::Last,
            (None, SortDirection::Descending) => NullPlacement::First,
        }
    }

    fn to_sql(self) -> String {
        let mut term = format!("{} {}", self.column, self.direction.sql_keyword());
        match self.nulls {
            Some(NullPlacement::First) => term.push_str(" NULLS FIRST"),
            Some(NullPlacement::Last) => term.push_str(" NULLS LAST"),
            None => {}
        }
        term
    }

    fn to_rest(self) -> String {
        let mut term = format!("{}.{}", self.column, self.direction.rest_keyword());
        match self.nulls {
            Some(NullPlacement::First) => term.push_str(".nullsfirst"),
            Some(NullPlacement::Last) => term.push_str(".nullslast"),
            None => {}
        }
        term
    }
}

/// An ordered list of sort terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderBy {
    terms: &'static [OrderTerm],
}

/// Ranking used by the policy listing page.
///
/// Most popular first with unscored policies at the bottom, ties broken by
/// immediate votes, then next-term votes, then newest first.
pub const POPULARITY_ORDER: OrderBy = OrderBy::new(&[
    OrderTerm::desc("popularity_score").nulls_last(),
    OrderTerm::desc("immediate_count"),
    OrderTerm::desc("next_count"),
    OrderTerm::desc("created_at"),
]);

impl OrderBy {
    /// Creates an ordering from a static list of terms
    pub const fn new(terms: &'static [OrderTerm]) -> Self {
        Self { terms }
    }

    /// Returns the terms in priority order
    pub fn terms(&self) -> &'static [OrderTerm] {
        self.terms
    }

    /// Returns the column names in priority order
    pub fn columns(&self) -> impl Iterator<Item = &'static str> {
        self.terms.iter().map(|term| term.column)
    }

    /// Checks that the ordering is non-empty and every column is a plain identifier
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty ordering and
    /// `CoreError::InvalidIdentifier` for a column that could not be
    /// embedded in a query as-is.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.terms.is_empty() {
            return Err(CoreError::validation("ordering must contain at least one term"));
        }
        for term in self.terms {
            if !is_identifier(term.column) {
                return Err(CoreError::invalid_identifier(term.column));
            }
        }
        Ok(())
    }

    /// Renders the body of a SQL `ORDER BY` clause
    pub fn to_sql(&self) -> Result<String, CoreError> {
        self.validate()?;
        Ok(self
            .terms
            .iter()
            .map(|term| term.to_sql())
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// Renders the `order` query parameter of the hosted REST layer
    pub fn to_postgrest(&self) -> Result<String, CoreError> {
        self.validate()?;
        Ok(self
            .terms
            .iter()
            .map(|term| term.to_rest())
            .collect::<Vec<_>>()
            .join(","))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.terms.iter().map(|term| term.to_sql()).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

/// Returns true for a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Returns true for an identifier optionally qualified by a schema (`schema.name`)
pub fn is_qualified_identifier(name: &str) -> bool {
    match name.split_once('.') {
        Some((schema, relation)) => is_identifier(schema) && is_identifier(relation),
        None => is_identifier(name),
    }
}
