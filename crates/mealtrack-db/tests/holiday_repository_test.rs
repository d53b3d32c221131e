//! Integration tests for the holiday repository using in-memory SurrealDB.

use chrono::NaiveDate;
use mealtrack_core::models::holiday::{CreateHoliday, HolidayKind};
use mealtrack_core::repository::HolidayRepository;
use mealtrack_db::repository::SurrealHolidayRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    mealtrack_db::run_migrations(&db).await.unwrap();
    db
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn create_and_find_by_date() {
    let db = setup().await;
    let repo = SurrealHolidayRepository::new(db);

    let holiday = repo
        .create(CreateHoliday {
            date: d("2026-03-26"),
            name: "Independence Day".into(),
            name_bn: "স্বাধীনতা দিবস".into(),
            kind: HolidayKind::Government,
        })
        .await
        .unwrap();

    assert_eq!(holiday.date, d("2026-03-26"));
    assert_eq!(holiday.kind, HolidayKind::Government);
    assert!(holiday.is_active);

    let found = repo.find_by_date(d("2026-03-26")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, holiday.id);
    assert_eq!(found[0].name, "Independence Day");

    // A day with no holidays yields an empty list, not an error.
    let empty = repo.find_by_date(d("2026-03-27")).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn duplicate_day_keeps_both_in_creation_order() {
    let db = setup().await;
    let repo = SurrealHolidayRepository::new(db);

    repo.create(CreateHoliday {
        date: d("2026-04-14"),
        name: "Bengali New Year".into(),
        name_bn: "পহেলা বৈশাখ".into(),
        kind: HolidayKind::Government,
    })
    .await
    .unwrap();
    repo.create(CreateHoliday {
        date: d("2026-04-14"),
        name: "Optional Observance".into(),
        name_bn: "ঐচ্ছিক".into(),
        kind: HolidayKind::Optional,
    })
    .await
    .unwrap();

    let found = repo.find_by_date(d("2026-04-14")).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "Bengali New Year");
    assert_eq!(found[1].name, "Optional Observance");
}

#[tokio::test]
async fn list_range_is_inclusive_and_ordered() {
    let db = setup().await;
    let repo = SurrealHolidayRepository::new(db);

    for (date, name) in [
        ("2026-02-21", "Language Martyrs' Day"),
        ("2026-03-26", "Independence Day"),
        ("2026-05-01", "May Day"),
    ] {
        repo.create(CreateHoliday {
            date: d(date),
            name: name.into(),
            name_bn: String::new(),
            kind: HolidayKind::Government,
        })
        .await
        .unwrap();
    }

    let found = repo
        .list_range(d("2026-02-21"), d("2026-03-31"))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].date, d("2026-02-21"));
    assert_eq!(found[1].date, d("2026-03-26"));
}

#[tokio::test]
async fn deactivated_holidays_disappear_from_reads() {
    let db = setup().await;
    let repo = SurrealHolidayRepository::new(db);

    let holiday = repo
        .create(CreateHoliday {
            date: d("2026-12-16"),
            name: "Victory Day".into(),
            name_bn: "বিজয় দিবস".into(),
            kind: HolidayKind::Government,
        })
        .await
        .unwrap();

    repo.deactivate(holiday.id).await.unwrap();

    assert!(repo.find_by_date(d("2026-12-16")).await.unwrap().is_empty());
    assert!(
        repo.list_range(d("2026-12-01"), d("2026-12-31"))
            .await
            .unwrap()
            .is_empty()
    );
}
