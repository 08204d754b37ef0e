//! PostgreSQL listing adapter tests against a real database
//!
//! These tests start a PostgreSQL container and are ignored unless run with
//! `--ignored` on a machine with Docker.

use chrono::Duration;
use core_kernel::{AdapterHealth, HealthCheckable, OperationMetadata, POPULARITY_ORDER};
use domain_policy::{FailureMode, PolicyListingPort, PolicyPageLoader, POLICY_VIEW};
use infra_db::PgPolicyListingAdapter;
use rust_decimal::Decimal;
use std::sync::Arc;
use test_utils::{assert_nulls_last, assert_ranked_by, db_test, TemporalFixtures, VoteTiming};

db_test!(test_rows_come_back_in_popularity_order, |db| {
    let launch = TemporalFixtures::launch();

    // score 2*2 + 1 = 5
    let a = db.insert_policy("Bus lanes", "More lanes", launch).await.unwrap();
    db.add_votes(a, VoteTiming::Immediate, 2).await.unwrap();
    db.add_votes(a, VoteTiming::Next, 1).await.unwrap();

    // score 1*2 + 3 = 5, fewer immediate votes than `a`
    let b = db.insert_policy("Rent controls", "Cap rents", launch).await.unwrap();
    db.add_votes(b, VoteTiming::Immediate, 1).await.unwrap();
    db.add_votes(b, VoteTiming::Next, 3).await.unwrap();

    // no votes: NULL score
    let c = db
        .insert_policy("Night buses", "All night", launch + Duration::days(3))
        .await
        .unwrap();

    // score 10
    let d = db.insert_policy("School meals", "Free", launch).await.unwrap();
    db.add_votes(d, VoteTiming::Immediate, 5).await.unwrap();

    let adapter = PgPolicyListingAdapter::new(db.pool().clone());
    let rows = adapter
        .fetch_ordered(POLICY_VIEW, POPULARITY_ORDER, None)
        .await
        .unwrap();

    let ids: Vec<String> = rows
        .iter()
        .map(|r| r.id().and_then(|v| v.as_str()).unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![d.to_string(), a.to_string(), b.to_string(), c.to_string()]);
    assert_ranked_by(&rows, &POPULARITY_ORDER);
    assert_nulls_last(&rows);

    assert_eq!(rows[0].popularity_score(), Some(Decimal::from(10)));
    assert_eq!(rows[0].immediate_count(), Some(5));
    assert_eq!(rows[3].popularity_score(), None);
    assert_eq!(rows[3].created_at(), Some(launch + Duration::days(3)));
});

db_test!(test_row_keeps_view_columns_in_order, |db| {
    db.insert_policy("Bus lanes", "More lanes", TemporalFixtures::launch())
        .await
        .unwrap();

    let adapter = PgPolicyListingAdapter::new(db.pool().clone());
    let rows = adapter
        .fetch_ordered(POLICY_VIEW, POPULARITY_ORDER, Some(OperationMetadata::with_correlation_id("t-1")))
        .await
        .unwrap();

    let columns: Vec<&str> = rows[0].columns().keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec!["id", "title", "summary", "created_at", "immediate_count", "next_count", "popularity_score"]
    );
});

db_test!(test_missing_view_is_not_found, |db| {
    let adapter = PgPolicyListingAdapter::new(db.pool().clone());

    let err = adapter
        .fetch_ordered("no_such_view", POPULARITY_ORDER, None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
});

db_test!(test_loader_over_database, |db| {
    db.insert_policy("Bus lanes", "More lanes", TemporalFixtures::launch())
        .await
        .unwrap();

    let adapter = Arc::new(PgPolicyListingAdapter::new(db.pool().clone()));
    assert_eq!(adapter.health_check().await.status, AdapterHealth::Healthy);

    let loader = PolicyPageLoader::new(adapter, FailureMode::EmptyOnError);
    let page = loader.load(None).await.unwrap();
    assert_eq!(page.len(), 1);

    db.clear_data().await.unwrap();
    assert!(loader.load(None).await.unwrap().is_empty());
});
