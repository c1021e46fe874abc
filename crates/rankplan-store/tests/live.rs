//! Live integration tests for `PgProjectStore` using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` and are ignored by default:
//! `cargo test -p rankplan-store -- --ignored`.

use chrono::Utc;
use rankplan_core::{BusinessProfile, FailureKind, Project, RunState, Stage};
use rankplan_store::{PgProjectStore, ProjectStore};

fn project(owner: &str) -> Project {
    Project::new(
        owner,
        "HealthPlus SEO",
        BusinessProfile::new("HealthPlus Clinic", "Healthcare"),
        Utc::now(),
    )
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn save_then_load_round_trips(pool: sqlx::PgPool) {
    let store = PgProjectStore::new(pool);
    let mut p = project("local");
    p.run_state = RunState::Failed {
        stage: Stage::PublishingCalendar,
        kind: FailureKind::Schema,
        message: "bad calendar".to_string(),
    };

    store.save(&p).await.unwrap();
    let loaded = store.load(p.id).await.unwrap().expect("row should exist");

    assert_eq!(loaded.id, p.id);
    assert_eq!(loaded.run_state, p.run_state);
    assert_eq!(loaded.data, p.data);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn save_upserts_and_delete_reports(pool: sqlx::PgPool) {
    let store = PgProjectStore::new(pool);
    let mut p = project("local");
    store.save(&p).await.unwrap();

    p.name = "Renamed".to_string();
    store.save(&p).await.unwrap();

    let listed = store.list("local").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Renamed");

    assert!(store.delete(p.id).await.unwrap());
    assert!(!store.delete(p.id).await.unwrap());
    assert!(store.list("local").await.unwrap().is_empty());
}
