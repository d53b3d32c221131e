//! SurrealDB implementation of [`MealRepository`].
//!
//! The record id is derived deterministically (UUIDv5) from the
//! natural key (user, date, meal type), so `upsert_manual` is a true
//! upsert: concurrent toggles of the same meal serialize on one
//! record instead of racing a lookup-then-write.

use chrono::{DateTime, NaiveDate, Utc};
use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::meal::{Meal, MealType, UpsertMeal};
use mealtrack_core::repository::MealRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{parse_date, parse_uuid};

#[derive(Debug, SurrealValue)]
struct MealRow {
    user_id: String,
    date: String,
    meal_type: String,
    is_on: bool,
    count: u32,
    is_manually_set: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_meal_type(s: &str) -> Result<MealType, DbError> {
    s.parse()
        .map_err(|_| DbError::Decode(format!("unknown meal type: {s}")))
}

impl MealRow {
    fn into_meal(self, id: Uuid) -> Result<Meal, DbError> {
        Ok(Meal {
            id,
            user_id: parse_uuid(&self.user_id)?,
            date: parse_date(&self.date)?,
            meal_type: parse_meal_type(&self.meal_type)?,
            is_on: self.is_on,
            count: self.count,
            is_manually_set: self.is_manually_set,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Deterministic record id for a (user, date, meal type) key.
fn meal_record_id(user_id: Uuid, date: NaiveDate, meal_type: MealType) -> Uuid {
    let key = format!("meal:{user_id}:{date}:{meal_type}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

/// SurrealDB implementation of the manual meal repository.
#[derive(Clone)]
pub struct SurrealMealRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMealRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MealRepository for SurrealMealRepository<C> {
    async fn find_manual(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> MealtrackResult<Option<Meal>> {
        let id = meal_record_id(user_id, date, meal_type);

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('meal', $id) \
                 WHERE is_manually_set = true",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MealRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_meal(id)?)),
            None => Ok(None),
        }
    }

    async fn upsert_manual(&self, input: UpsertMeal) -> MealtrackResult<Meal> {
        let id = meal_record_id(input.user_id, input.date, input.meal_type);
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPSERT type::record('meal', $id) SET \
                 user_id = $user_id, date = $date, \
                 meal_type = $meal_type, is_on = $is_on, \
                 count = $count, is_manually_set = true, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("date", input.date.to_string()))
            .bind(("meal_type", input.meal_type.as_str().to_string()))
            .bind(("is_on", input.is_on))
            .bind(("count", input.count))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<MealRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "meal".into(),
            id: id_str,
        })?;

        Ok(row.into_meal(id)?)
    }

    async fn reset(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> MealtrackResult<()> {
        let id = meal_record_id(user_id, date, meal_type);

        self.db
            .query("DELETE type::record('meal', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
