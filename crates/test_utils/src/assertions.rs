//! Custom Test Assertions
//!
//! Provides assertion helpers for policy listings that give more
//! meaningful failure messages than comparing whole vectors.

use core_kernel::OrderBy;
use domain_policy::{compare_records, PolicyPage, PolicyRecord};
use serde_json::Value;

/// Asserts that `records` are ordered by `order`
///
/// # Panics
///
/// Panics at the first adjacent pair that is out of order, naming both ids
pub fn assert_ranked_by(records: &[PolicyRecord], order: &OrderBy) {
    for (index, pair) in records.windows(2).enumerate() {
        assert!(
            compare_records(&pair[0], &pair[1], order).is_le(),
            "Rows {} and {} out of order for `{}`: {:?} before {:?}",
            index,
            index + 1,
            order,
            pair[0].id(),
            pair[1].id()
        );
    }
}

/// Asserts that the rows carry the given ids, in that order
pub fn assert_ids_in_order(records: &[PolicyRecord], expected: &[&str]) {
    let actual: Vec<String> = records
        .iter()
        .map(|r| match r.id() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<no id>".to_string(),
        })
        .collect();

    assert_eq!(actual, expected, "Unexpected row order");
}

/// Asserts that every row with a NULL score comes after every scored row
pub fn assert_nulls_last(records: &[PolicyRecord]) {
    if let Some(first_null) = records.iter().position(|r| r.popularity_score().is_none()) {
        let scored_after = records[first_null..]
            .iter()
            .position(|r| r.popularity_score().is_some());
        assert!(
            scored_after.is_none(),
            "Scored row at position {} follows an unscored row at position {}",
            first_null + scored_after.unwrap_or_default(),
            first_null
        );
    }
}

/// Asserts that a page is empty
pub fn assert_page_empty(page: &PolicyPage) {
    assert!(
        page.is_empty(),
        "Expected an empty page, got {} policies",
        page.len()
    );
}

/// Asserts that the page holds exactly `expected`, unchanged and in order
pub fn assert_page_passthrough(page: &PolicyPage, expected: &[PolicyRecord]) {
    assert_eq!(
        page.len(),
        expected.len(),
        "Page holds {} policies, expected {}",
        page.len(),
        expected.len()
    );
    for (index, (actual, wanted)) in page.policies.iter().zip(expected).enumerate() {
        assert_eq!(actual, wanted, "Policy at position {} was altered", index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::PolicyFixtures;
    use core_kernel::POPULARITY_ORDER;

    #[test]
    fn test_ranked_fixtures_pass() {
        let rows = PolicyFixtures::ranked_listing();
        assert_ranked_by(&rows, &POPULARITY_ORDER);
        assert_nulls_last(&rows);
        assert_ids_in_order(&rows, &PolicyFixtures::ranked_ids());
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_unranked_fixtures_fail() {
        assert_ranked_by(&PolicyFixtures::unranked_listing(), &POPULARITY_ORDER);
    }

    #[test]
    #[should_panic(expected = "follows an unscored row")]
    fn test_nulls_first_fails() {
        assert_nulls_last(&PolicyFixtures::unranked_listing());
    }
}
