//! Tests for sort order rendering and validation

use core_kernel::{CoreError, NullPlacement, OrderBy, OrderTerm, SortDirection, POPULARITY_ORDER};

#[test]
fn test_popularity_order_columns_are_fixed() {
    let columns: Vec<&str> = POPULARITY_ORDER.columns().collect();
    assert_eq!(
        columns,
        vec!["popularity_score", "immediate_count", "next_count", "created_at"]
    );
    assert!(POPULARITY_ORDER
        .terms()
        .iter()
        .all(|term| term.direction == SortDirection::Descending));
}

#[test]
fn test_popularity_order_only_score_sets_null_placement() {
    let terms = POPULARITY_ORDER.terms();
    assert_eq!(terms[0].nulls, Some(NullPlacement::Last));
    assert!(terms[1..].iter().all(|term| term.nulls.is_none()));
}

#[test]
fn test_popularity_order_to_sql() {
    assert_eq!(
        POPULARITY_ORDER.to_sql().unwrap(),
        "popularity_score DESC NULLS LAST, immediate_count DESC, next_count DESC, created_at DESC"
    );
}

#[test]
fn test_popularity_order_to_postgrest() {
    assert_eq!(
        POPULARITY_ORDER.to_postgrest().unwrap(),
        "popularity_score.desc.nullslast,immediate_count.desc,next_count.desc,created_at.desc"
    );
}

#[test]
fn test_ascending_nulls_first_rendering() {
    const ORDER: OrderBy = OrderBy::new(&[OrderTerm::asc("title").nulls_first()]);

    assert_eq!(ORDER.to_sql().unwrap(), "title ASC NULLS FIRST");
    assert_eq!(ORDER.to_postgrest().unwrap(), "title.asc.nullsfirst");
}

#[test]
fn test_empty_order_rejected() {
    const EMPTY: OrderBy = OrderBy::new(&[]);

    assert!(matches!(EMPTY.validate(), Err(CoreError::Validation(_))));
    assert!(EMPTY.to_sql().is_err());
    assert!(EMPTY.to_postgrest().is_err());
}

#[test]
fn test_injected_column_rejected() {
    const HOSTILE: OrderBy = OrderBy::new(&[OrderTerm::desc("created_at; DROP TABLE policy")]);

    match HOSTILE.to_sql() {
        Err(CoreError::InvalidIdentifier(name)) => assert!(name.contains("DROP")),
        other => panic!("Expected InvalidIdentifier, got {:?}", other),
    }
}

mod identifier_properties {
    use core_kernel::ordering::{is_identifier, is_qualified_identifier};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn snake_case_names_are_identifiers(name in "[a-z_][a-z0-9_]{0,30}") {
            prop_assert!(is_identifier(&name));
            prop_assert!(is_qualified_identifier(&name));
        }

        #[test]
        fn names_with_sql_punctuation_are_rejected(
            head in "[a-z]{1,8}",
            punct in "[ ;'\"()\\-,*]",
            tail in "[a-z]{0,8}",
        ) {
            let name = format!("{}{}{}", head, punct, tail);
            prop_assert!(!is_identifier(&name));
            prop_assert!(!is_qualified_identifier(&name));
        }
    }
}
