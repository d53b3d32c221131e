//! SurrealDB implementation of [`MonthSettingsRepository`].
//!
//! One record per (year, month), addressed by a UUIDv5 derived from
//! that key, so upserts land on the same record every time.

use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::month::{MonthSettings, UpsertMonthSettings};
use mealtrack_core::repository::MonthSettingsRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_date;

#[derive(Debug, SurrealValue)]
struct MonthRow {
    year: i32,
    month: u32,
    start_date: String,
    end_date: String,
    is_finalized: bool,
}

impl MonthRow {
    fn into_settings(self, id: Uuid) -> Result<MonthSettings, DbError> {
        Ok(MonthSettings {
            id,
            year: self.year,
            month: self.month,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            is_finalized: self.is_finalized,
        })
    }
}

/// Deterministic record id for a (year, month) key.
fn month_record_id(year: i32, month: u32) -> Uuid {
    let key = format!("month:{year}:{month}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

/// SurrealDB implementation of the month settings repository.
#[derive(Clone)]
pub struct SurrealMonthSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMonthSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MonthSettingsRepository for SurrealMonthSettingsRepository<C> {
    async fn find(&self, year: i32, month: u32) -> MealtrackResult<Option<MonthSettings>> {
        let id = month_record_id(year, month);

        let mut result = self
            .db
            .query("SELECT * FROM type::record('month_settings', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MonthRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_settings(id)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, input: UpsertMonthSettings) -> MealtrackResult<MonthSettings> {
        let id = month_record_id(input.year, input.month);
        let id_str = id.to_string();

        // is_finalized is deliberately not touched here: re-saving the
        // window of an already-finalized month must not unlock it.
        let result = self
            .db
            .query(
                "UPSERT type::record('month_settings', $id) SET \
                 year = $year, month = $month, \
                 start_date = $start_date, end_date = $end_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("year", input.year))
            .bind(("month", input.month))
            .bind(("start_date", input.start_date.to_string()))
            .bind(("end_date", input.end_date.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<MonthRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "month_settings".into(),
            id: id_str,
        })?;

        Ok(row.into_settings(id)?)
    }

    async fn finalize(&self, year: i32, month: u32) -> MealtrackResult<MonthSettings> {
        let id = month_record_id(year, month);
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('month_settings', $id) SET \
                 is_finalized = true",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<MonthRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "month_settings".into(),
            id: id_str,
        })?;

        Ok(row.into_settings(id)?)
    }
}
