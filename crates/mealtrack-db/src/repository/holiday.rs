//! SurrealDB implementation of [`HolidayRepository`].
//!
//! Dates are stored as `YYYY-MM-DD` strings, so range queries are
//! plain lexicographic comparisons and matching stays day-granular by
//! construction. Reads return rows in `created_at` ascending order —
//! the documented tie-break when one day carries duplicate holidays.

use chrono::{DateTime, NaiveDate, Utc};
use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::holiday::{CreateHoliday, Holiday, HolidayKind};
use mealtrack_core::repository::HolidayRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{parse_date, parse_uuid};

#[derive(Debug, SurrealValue)]
struct HolidayRow {
    date: String,
    name: String,
    name_bn: String,
    kind: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct HolidayRowWithId {
    record_id: String,
    date: String,
    name: String,
    name_bn: String,
    kind: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

fn parse_kind(s: &str) -> Result<HolidayKind, DbError> {
    s.parse()
        .map_err(|_| DbError::Decode(format!("unknown holiday kind: {s}")))
}

impl HolidayRow {
    fn into_holiday(self, id: Uuid) -> Result<Holiday, DbError> {
        Ok(Holiday {
            id,
            date: parse_date(&self.date)?,
            name: self.name,
            name_bn: self.name_bn,
            kind: parse_kind(&self.kind)?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

impl HolidayRowWithId {
    fn try_into_holiday(self) -> Result<Holiday, DbError> {
        let id = parse_uuid(&self.record_id)?;
        Ok(Holiday {
            id,
            date: parse_date(&self.date)?,
            name: self.name,
            name_bn: self.name_bn,
            kind: parse_kind(&self.kind)?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the holiday repository.
#[derive(Clone)]
pub struct SurrealHolidayRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealHolidayRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> HolidayRepository for SurrealHolidayRepository<C> {
    async fn create(&self, input: CreateHoliday) -> MealtrackResult<Holiday> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('holiday', $id) SET \
                 date = $date, name = $name, name_bn = $name_bn, \
                 kind = $kind",
            )
            .bind(("id", id_str.clone()))
            .bind(("date", input.date.to_string()))
            .bind(("name", input.name))
            .bind(("name_bn", input.name_bn))
            .bind(("kind", input.kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<HolidayRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "holiday".into(),
            id: id_str,
        })?;

        Ok(row.into_holiday(id)?)
    }

    async fn find_by_date(&self, date: NaiveDate) -> MealtrackResult<Vec<Holiday>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM holiday \
                 WHERE date = $date AND is_active = true \
                 ORDER BY created_at ASC",
            )
            .bind(("date", date.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<HolidayRowWithId> = result.take(0).map_err(DbError::from)?;
        let holidays = rows
            .into_iter()
            .map(HolidayRowWithId::try_into_holiday)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(holidays)
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> MealtrackResult<Vec<Holiday>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM holiday \
                 WHERE date >= $from AND date <= $to \
                 AND is_active = true \
                 ORDER BY date ASC, created_at ASC",
            )
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<HolidayRowWithId> = result.take(0).map_err(DbError::from)?;
        let holidays = rows
            .into_iter()
            .map(HolidayRowWithId::try_into_holiday)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(holidays)
    }

    async fn deactivate(&self, id: Uuid) -> MealtrackResult<()> {
        self.db
            .query(
                "UPDATE type::record('holiday', $id) SET \
                 is_active = false",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
