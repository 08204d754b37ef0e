//! Test Data Builders
//!
//! Provides a builder for policy rows with sensible defaults. Tests specify
//! only the columns relevant to them; everything else gets a plausible
//! value.

use chrono::{DateTime, Utc};
use domain_policy::PolicyRecord;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::fixtures::TemporalFixtures;

/// Builder for constructing policy rows
pub struct PolicyRecordBuilder {
    id: Value,
    title: String,
    summary: String,
    popularity_score: Option<Decimal>,
    immediate_count: Option<i64>,
    next_count: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    extra: Map<String, Value>,
}

impl Default for PolicyRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRecordBuilder {
    /// Creates a new builder with a random id and generated text
    pub fn new() -> Self {
        Self {
            id: Value::String(Uuid::new_v4().to_string()),
            title: Sentence(2..6).fake(),
            summary: Paragraph(1..3).fake(),
            popularity_score: None,
            immediate_count: Some(0),
            next_count: Some(0),
            created_at: Some(TemporalFixtures::launch()),
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_score(mut self, score: Decimal) -> Self {
        self.popularity_score = Some(score);
        self
    }

    pub fn without_score(mut self) -> Self {
        self.popularity_score = None;
        self
    }

    /// Sets both vote counts
    pub fn with_votes(mut self, immediate: i64, next: i64) -> Self {
        self.immediate_count = Some(immediate);
        self.next_count = Some(next);
        self
    }

    pub fn with_null_counts(mut self) -> Self {
        self.immediate_count = None;
        self.next_count = None;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Adds a column the ranking does not look at
    pub fn with_column(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// Builds the row with columns in view order
    pub fn build(self) -> PolicyRecord {
        let mut columns = Map::new();
        columns.insert("id".to_string(), self.id);
        columns.insert("title".to_string(), Value::String(self.title));
        columns.insert("summary".to_string(), Value::String(self.summary));
        columns.insert(
            "created_at".to_string(),
            self.created_at
                .map(|t| Value::String(t.to_rfc3339()))
                .unwrap_or(Value::Null),
        );
        columns.insert("immediate_count".to_string(), self.immediate_count.into());
        columns.insert("next_count".to_string(), self.next_count.into());
        columns.insert("popularity_score".to_string(), score_value(self.popularity_score));
        columns.extend(self.extra);
        PolicyRecord::new(columns)
    }
}

/// Encodes a score as a JSON number, the way the store sends numerics
fn score_value(score: Option<Decimal>) -> Value {
    score
        .and_then(|s| serde_json::from_str::<Value>(&s.normalize().to_string()).ok())
        .unwrap_or(Value::Null)
}
