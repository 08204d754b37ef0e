//! Pre-built Test Fixtures
//!
//! Provides ready-to-use policy rows whose popularity ranking is known in
//! advance. These fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use domain_policy::PolicyRecord;
use serde_json::{json, Value};

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Launch of the board (Jan 1, 2024)
    pub fn launch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    /// A week after launch
    pub fn week_one() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()
    }

    /// Mid-year timestamp
    pub fn mid_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }
}

/// Fixture for policy rows as the listing view returns them
pub struct PolicyFixtures;

impl PolicyFixtures {
    fn row(
        id: &str,
        title: &str,
        score: Value,
        immediate: i64,
        next: i64,
        created_at: DateTime<Utc>,
    ) -> PolicyRecord {
        PolicyRecord::from_value(json!({
            "id": id,
            "title": title,
            "summary": format!("{} for everyone", title),
            "created_at": created_at.to_rfc3339(),
            "immediate_count": immediate,
            "next_count": next,
            "popularity_score": score,
        }))
        .expect("fixture rows are JSON objects")
    }

    /// Highest score on the board
    pub fn free_school_meals() -> PolicyRecord {
        Self::row("pol-001", "Free school meals", json!(42.5), 20, 2, TemporalFixtures::launch())
    }

    /// Same score as `bus_lanes`, wins on immediate votes
    pub fn rent_controls() -> PolicyRecord {
        Self::row("pol-002", "Rent controls", json!(30), 12, 6, TemporalFixtures::launch())
    }

    /// Same score as `rent_controls`, fewer immediate votes
    pub fn bus_lanes() -> PolicyRecord {
        Self::row("pol-003", "Bus lanes", json!(30), 10, 10, TemporalFixtures::week_one())
    }

    /// Same score and immediate votes as `bus_lanes`, fewer next votes
    pub fn library_hours() -> PolicyRecord {
        Self::row("pol-004", "Longer library hours", json!(30), 10, 4, TemporalFixtures::mid_year())
    }

    /// No votes yet: NULL score
    pub fn new_proposal() -> PolicyRecord {
        Self::row("pol-005", "Community solar", Value::Null, 0, 0, TemporalFixtures::mid_year())
    }

    /// Older unscored proposal
    pub fn old_proposal() -> PolicyRecord {
        Self::row("pol-006", "Night buses", Value::Null, 0, 0, TemporalFixtures::launch())
    }

    /// The fixtures in the order the store must return them
    pub fn ranked_listing() -> Vec<PolicyRecord> {
        vec![
            Self::free_school_meals(),
            Self::rent_controls(),
            Self::bus_lanes(),
            Self::library_hours(),
            Self::new_proposal(),
            Self::old_proposal(),
        ]
    }

    /// The same fixtures shuffled
    pub fn unranked_listing() -> Vec<PolicyRecord> {
        vec![
            Self::old_proposal(),
            Self::bus_lanes(),
            Self::new_proposal(),
            Self::free_school_meals(),
            Self::library_hours(),
            Self::rent_controls(),
        ]
    }

    /// Ids in ranked order
    pub fn ranked_ids() -> Vec<&'static str> {
        vec!["pol-001", "pol-002", "pol-003", "pol-004", "pol-005", "pol-006"]
    }
}

/// Fixture for raw REST responses
pub struct ResponseFixtures;

impl ResponseFixtures {
    /// The ranked listing as a JSON array body
    pub fn ranked_body() -> Value {
        Value::Array(
            PolicyFixtures::ranked_listing()
                .into_iter()
                .map(Value::from)
                .collect(),
        )
    }

    /// Error body the REST layer sends for a missing relation
    pub fn missing_relation_body() -> Value {
        json!({
            "code": "42P01",
            "details": null,
            "hint": null,
            "message": "relation \"public.policy_with_popularity\" does not exist"
        })
    }
}
