//! Integration tests for the settings repository using in-memory SurrealDB.

use mealtrack_core::models::settings::{CutoffTimes, UpdateGlobalSettings, WeekendPolicy};
use mealtrack_core::repository::SettingsRepository;
use mealtrack_db::repository::SurrealSettingsRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    mealtrack_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn get_returns_defaults_when_nothing_stored() {
    let db = setup().await;
    let repo = SurrealSettingsRepository::new(db);

    let settings = repo.get().await.unwrap();

    assert!(settings.weekend_policy.friday_off);
    assert!(!settings.weekend_policy.saturday_off);
    assert!(settings.weekend_policy.odd_saturday_off);
    assert!(!settings.weekend_policy.even_saturday_off);
    assert_eq!(settings.cutoff_times.lunch_hour, 10);
    assert_eq!(settings.cutoff_times.dinner_hour, 16);
    assert!(settings.default_meal_status.lunch);
    assert!(settings.default_meal_status.dinner);
}

#[tokio::test]
async fn partial_update_preserves_other_sections() {
    let db = setup().await;
    let repo = SurrealSettingsRepository::new(db);

    let updated = repo
        .update(UpdateGlobalSettings {
            cutoff_times: Some(CutoffTimes {
                lunch_hour: 9,
                dinner_hour: 17,
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.cutoff_times.lunch_hour, 9);
    assert_eq!(updated.cutoff_times.dinner_hour, 17);
    // Untouched sections keep their defaults.
    assert!(updated.weekend_policy.friday_off);
    assert!(updated.holiday_policy.government_off);

    // A later read sees the persisted merge.
    let fetched = repo.get().await.unwrap();
    assert_eq!(fetched.cutoff_times.lunch_hour, 9);
    assert!(fetched.weekend_policy.odd_saturday_off);
}

#[tokio::test]
async fn sequential_updates_compose() {
    let db = setup().await;
    let repo = SurrealSettingsRepository::new(db);

    repo.update(UpdateGlobalSettings {
        weekend_policy: Some(WeekendPolicy {
            friday_off: true,
            saturday_off: true,
            odd_saturday_off: false,
            even_saturday_off: false,
        }),
        ..Default::default()
    })
    .await
    .unwrap();

    let after = repo
        .update(UpdateGlobalSettings {
            cutoff_times: Some(CutoffTimes {
                lunch_hour: 11,
                dinner_hour: 16,
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    // The second update must not clobber the first.
    assert!(after.weekend_policy.saturday_off);
    assert!(!after.weekend_policy.odd_saturday_off);
    assert_eq!(after.cutoff_times.lunch_hour, 11);
}
