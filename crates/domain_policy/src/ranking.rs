//! In-memory ranking
//!
//! Reproduces the store's `ORDER BY` semantics over [`PolicyRecord`]s so
//! rows can be ranked without a database (the mock adapter, property tests)
//! and so a received listing can be checked against its requested order.
//!
//! Per term: NULL and missing columns follow [`OrderTerm::effective_nulls`];
//! numbers compare as decimals; strings that look like timestamps compare
//! chronologically and other strings lexically; `false < true`.

use chrono::{DateTime, Utc};
use core_kernel::{NullPlacement, OrderBy, OrderTerm, SortDirection};
use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;

use crate::record::{decimal_value, parse_timestamp, PolicyRecord};

/// Comparable form of a non-null column value.
///
/// Variant order ranks values of different JSON types against each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Bool(bool),
    Number(Decimal),
    Timestamp(DateTime<Utc>),
    Text(String),
    Other(String),
}

fn sort_value(value: Option<&Value>) -> Option<SortValue> {
    match value? {
        Value::Null => None,
        Value::Bool(flag) => Some(SortValue::Bool(*flag)),
        number @ Value::Number(_) => Some(
            decimal_value(number)
                .map(SortValue::Number)
                .unwrap_or_else(|| SortValue::Text(number.to_string())),
        ),
        Value::String(text) => Some(
            parse_timestamp(text)
                .map(SortValue::Timestamp)
                .unwrap_or_else(|| SortValue::Text(text.clone())),
        ),
        other => Some(SortValue::Other(other.to_string())),
    }
}

fn compare_term(a: &PolicyRecord, b: &PolicyRecord, term: &OrderTerm) -> Ordering {
    let nulls_first = term.effective_nulls() == NullPlacement::First;
    match (sort_value(a.get(term.column)), sort_value(b.get(term.column))) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) if nulls_first => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) if nulls_first => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => match term.direction {
            SortDirection::Ascending => left.cmp(&right),
            SortDirection::Descending => right.cmp(&left),
        },
    }
}

/// Compares two records under `order`, first differing term wins
pub fn compare_records(a: &PolicyRecord, b: &PolicyRecord, order: &OrderBy) -> Ordering {
    order
        .terms()
        .iter()
        .map(|term| compare_term(a, b, term))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sorts records in place; rows that tie on every term keep their relative order
pub fn rank(records: &mut [PolicyRecord], order: &OrderBy) {
    records.sort_by(|a, b| compare_records(a, b, order));
}

/// Returns true if no adjacent pair of records is out of order
pub fn is_ranked(records: &[PolicyRecord], order: &OrderBy) -> bool {
    records
        .windows(2)
        .all(|pair| compare_records(&pair[0], &pair[1], order) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::POPULARITY_ORDER;
    use serde_json::json;

    fn record(score: Value, immediate: i64, next: i64, created_at: &str) -> PolicyRecord {
        PolicyRecord::default()
            .with("popularity_score", score)
            .with("immediate_count", immediate)
            .with("next_count", next)
            .with("created_at", created_at)
    }

    #[test]
    fn test_higher_score_first() {
        let a = record(json!(10), 0, 0, "2024-01-01T00:00:00Z");
        let b = record(json!(2.5), 9, 9, "2024-06-01T00:00:00Z");

        assert_eq!(compare_records(&a, &b, &POPULARITY_ORDER), Ordering::Less);
    }

    #[test]
    fn test_null_score_sorts_last() {
        let scored = record(json!(-4), 0, 0, "2024-01-01T00:00:00Z");
        let unscored = record(Value::Null, 50, 50, "2024-06-01T00:00:00Z");
        let missing = PolicyRecord::default().with("immediate_count", 100);

        assert_eq!(compare_records(&scored, &unscored, &POPULARITY_ORDER), Ordering::Less);
        assert_eq!(compare_records(&scored, &missing, &POPULARITY_ORDER), Ordering::Less);
    }

    #[test]
    fn test_tie_breakers_in_sequence() {
        let base = record(json!(5), 3, 1, "2024-01-01T00:00:00Z");
        let more_immediate = record(json!(5), 4, 0, "2023-01-01T00:00:00Z");
        let more_next = record(json!(5), 3, 2, "2023-01-01T00:00:00Z");
        let newer = record(json!(5), 3, 1, "2024-02-01T00:00:00Z");

        assert_eq!(compare_records(&more_immediate, &base, &POPULARITY_ORDER), Ordering::Less);
        assert_eq!(compare_records(&more_next, &base, &POPULARITY_ORDER), Ordering::Less);
        assert_eq!(compare_records(&newer, &base, &POPULARITY_ORDER), Ordering::Less);
    }

    #[test]
    fn test_null_count_sorts_first_under_store_default() {
        let counted = record(json!(5), 3, 1, "2024-01-01T00:00:00Z");
        let uncounted = record(json!(5), 3, 1, "2024-01-01T00:00:00Z").with("immediate_count", Value::Null);

        assert_eq!(compare_records(&uncounted, &counted, &POPULARITY_ORDER), Ordering::Less);
    }

    #[test]
    fn test_timestamps_compare_across_offsets() {
        let earlier = record(json!(1), 1, 1, "2024-01-01T10:00:00+02:00");
        let later = record(json!(1), 1, 1, "2024-01-01T09:00:00Z");

        assert_eq!(compare_records(&later, &earlier, &POPULARITY_ORDER), Ordering::Less);
    }

    #[test]
    fn test_rank_is_stable_for_full_ties() {
        let first = record(json!(1), 1, 1, "2024-01-01T00:00:00Z").with("id", 1);
        let second = record(json!(1), 1, 1, "2024-01-01T00:00:00Z").with("id", 2);
        let mut rows = vec![first, second];

        rank(&mut rows, &POPULARITY_ORDER);

        assert_eq!(rows[0].id(), Some(&json!(1)));
        assert!(is_ranked(&rows, &POPULARITY_ORDER));
    }
}
