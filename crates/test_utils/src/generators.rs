//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating policy rows and listings
//! that look like what the listing view returns.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_policy::PolicyRecord;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::PolicyRecordBuilder;

/// Strategy for vote counts; small ranges so ties happen often
pub fn vote_count_strategy() -> impl Strategy<Value = i64> {
    0i64..6i64
}

/// Strategy for popularity scores, NULL about a quarter of the time
pub fn score_strategy() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        1 => Just(None),
        3 => (0i64..40i64, 0u32..2u32).prop_map(|(m, s)| Some(Decimal::new(m, s))),
    ]
}

/// Strategy for creation timestamps within the first days of 2024
pub fn created_at_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..10i64).prop_map(|hours| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    })
}

/// Strategy for a single row with the given id
pub fn policy_record_strategy(id: i64) -> impl Strategy<Value = PolicyRecord> {
    (
        score_strategy(),
        vote_count_strategy(),
        vote_count_strategy(),
        created_at_strategy(),
    )
        .prop_map(move |(score, immediate, next, created_at)| {
            let builder = PolicyRecordBuilder::new()
                .with_id(id)
                .with_title(format!("Policy {}", id))
                .with_votes(immediate, next)
                .created_at(created_at);
            match score {
                Some(score) => builder.with_score(score),
                None => builder.without_score(),
            }
            .build()
        })
}

/// Strategy for a listing of up to `max_len` rows with distinct ids
pub fn policy_listing_strategy(max_len: usize) -> impl Strategy<Value = Vec<PolicyRecord>> {
    (0..=max_len).prop_flat_map(|len| {
        (0..len)
            .map(|i| policy_record_strategy(i as i64 + 1))
            .collect::<Vec<_>>()
    })
}
