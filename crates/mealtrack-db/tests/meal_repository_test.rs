//! Integration tests for the meal repository using in-memory SurrealDB.

use chrono::NaiveDate;
use mealtrack_core::models::meal::{MealType, UpsertMeal};
use mealtrack_core::repository::MealRepository;
use mealtrack_db::repository::SurrealMealRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

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
async fn upsert_then_find_manual() {
    let db = setup().await;
    let repo = SurrealMealRepository::new(db);
    let user_id = Uuid::new_v4();

    let meal = repo
        .upsert_manual(UpsertMeal {
            user_id,
            date: d("2026-01-15"),
            meal_type: MealType::Lunch,
            is_on: false,
            count: 0,
        })
        .await
        .unwrap();

    assert_eq!(meal.user_id, user_id);
    assert_eq!(meal.date, d("2026-01-15"));
    assert_eq!(meal.meal_type, MealType::Lunch);
    assert!(!meal.is_on);
    assert!(meal.is_manually_set);

    let found = repo
        .find_manual(user_id, d("2026-01-15"), MealType::Lunch)
        .await
        .unwrap()
        .expect("manual record should exist");
    assert_eq!(found.id, meal.id);
    assert!(!found.is_on);
}

#[tokio::test]
async fn upsert_replaces_the_same_record() {
    let db = setup().await;
    let repo = SurrealMealRepository::new(db);
    let user_id = Uuid::new_v4();

    let first = repo
        .upsert_manual(UpsertMeal {
            user_id,
            date: d("2026-01-15"),
            meal_type: MealType::Dinner,
            is_on: false,
            count: 0,
        })
        .await
        .unwrap();

    let second = repo
        .upsert_manual(UpsertMeal {
            user_id,
            date: d("2026-01-15"),
            meal_type: MealType::Dinner,
            is_on: true,
            count: 2,
        })
        .await
        .unwrap();

    // Same (user, date, meal type) key means same record.
    assert_eq!(first.id, second.id);
    assert!(second.is_on);
    assert_eq!(second.count, 2);

    let found = repo
        .find_manual(user_id, d("2026-01-15"), MealType::Dinner)
        .await
        .unwrap()
        .unwrap();
    assert!(found.is_on);
    assert_eq!(found.count, 2);
}

#[tokio::test]
async fn lookups_are_scoped_to_the_exact_key() {
    let db = setup().await;
    let repo = SurrealMealRepository::new(db);
    let user_id = Uuid::new_v4();

    repo.upsert_manual(UpsertMeal {
        user_id,
        date: d("2026-01-15"),
        meal_type: MealType::Lunch,
        is_on: true,
        count: 1,
    })
    .await
    .unwrap();

    // Different meal type, date, or user: no match.
    assert!(
        repo.find_manual(user_id, d("2026-01-15"), MealType::Dinner)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_manual(user_id, d("2026-01-16"), MealType::Lunch)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_manual(Uuid::new_v4(), d("2026-01-15"), MealType::Lunch)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn reset_removes_the_manual_record() {
    let db = setup().await;
    let repo = SurrealMealRepository::new(db);
    let user_id = Uuid::new_v4();

    repo.upsert_manual(UpsertMeal {
        user_id,
        date: d("2026-01-15"),
        meal_type: MealType::Lunch,
        is_on: false,
        count: 0,
    })
    .await
    .unwrap();

    repo.reset(user_id, d("2026-01-15"), MealType::Lunch)
        .await
        .unwrap();

    assert!(
        repo.find_manual(user_id, d("2026-01-15"), MealType::Lunch)
            .await
            .unwrap()
            .is_none()
    );

    // Resetting an absent record is a no-op, not an error.
    repo.reset(user_id, d("2026-01-15"), MealType::Lunch)
        .await
        .unwrap();
}
