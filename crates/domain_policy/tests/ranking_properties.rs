//! Property tests for the popularity ranking
//!
//! Random listings with many ties and NULL scores are ranked and checked
//! against the order's guarantees.

use core_kernel::POPULARITY_ORDER;
use domain_policy::{compare_records, is_ranked, rank};
use proptest::prelude::*;
use std::cmp::Ordering;
use test_utils::{assert_nulls_last, assert_ranked_by, policy_listing_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn ranking_is_a_permutation(rows in policy_listing_strategy(20)) {
        let mut ranked = rows.clone();
        rank(&mut ranked, &POPULARITY_ORDER);

        prop_assert_eq!(ranked.len(), rows.len());
        for row in &rows {
            prop_assert!(ranked.contains(row));
        }
    }

    #[test]
    fn ranked_output_satisfies_order(rows in policy_listing_strategy(20)) {
        let mut ranked = rows;
        rank(&mut ranked, &POPULARITY_ORDER);

        prop_assert!(is_ranked(&ranked, &POPULARITY_ORDER));
        assert_ranked_by(&ranked, &POPULARITY_ORDER);
        assert_nulls_last(&ranked);
    }

    #[test]
    fn ranking_is_idempotent(rows in policy_listing_strategy(20)) {
        let mut once = rows;
        rank(&mut once, &POPULARITY_ORDER);
        let mut twice = once.clone();
        rank(&mut twice, &POPULARITY_ORDER);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn scores_never_increase(rows in policy_listing_strategy(20)) {
        let mut ranked = rows;
        rank(&mut ranked, &POPULARITY_ORDER);

        let scores: Vec<_> = ranked.iter().filter_map(|r| r.popularity_score()).collect();
        prop_assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn comparison_is_antisymmetric(rows in policy_listing_strategy(2)) {
        if let [a, b] = rows.as_slice() {
            let forward = compare_records(a, b, &POPULARITY_ORDER);
            let backward = compare_records(b, a, &POPULARITY_ORDER);
            prop_assert_eq!(forward, backward.reverse());
        }
    }

    #[test]
    fn full_ties_keep_input_order(rows in policy_listing_strategy(20)) {
        let mut ranked = rows.clone();
        rank(&mut ranked, &POPULARITY_ORDER);

        for pair in ranked.windows(2) {
            if compare_records(&pair[0], &pair[1], &POPULARITY_ORDER) == Ordering::Equal {
                let first = rows.iter().position(|r| r == &pair[0]);
                let second = rows.iter().position(|r| r == &pair[1]);
                prop_assert!(first < second);
            }
        }
    }
}
