//! SurrealDB implementation of [`SettingsRepository`].
//!
//! The settings table holds exactly one record under the fixed id
//! `global`. A missing record is not an error: reads return the
//! documented defaults, so the resolver never fails on absent policy
//! data.

use chrono::{DateTime, Utc};
use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::settings::{
    CutoffTimes, DefaultMealStatus, GlobalSettings, HolidayPolicy, UpdateGlobalSettings,
    WeekendPolicy,
};
use mealtrack_core::repository::SettingsRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// Fixed record id of the singleton.
const SETTINGS_ID: &str = "global";

#[derive(Debug, SurrealValue)]
struct WeekendPolicyRow {
    friday_off: bool,
    saturday_off: bool,
    odd_saturday_off: bool,
    even_saturday_off: bool,
}

#[derive(Debug, SurrealValue)]
struct HolidayPolicyRow {
    government_off: bool,
    optional_off: bool,
    religious_off: bool,
}

#[derive(Debug, SurrealValue)]
struct CutoffTimesRow {
    lunch_hour: u32,
    dinner_hour: u32,
}

#[derive(Debug, SurrealValue)]
struct DefaultMealStatusRow {
    lunch: bool,
    dinner: bool,
}

#[derive(Debug, SurrealValue)]
struct SettingsRow {
    weekend_policy: WeekendPolicyRow,
    holiday_policy: HolidayPolicyRow,
    cutoff_times: CutoffTimesRow,
    default_meal_status: DefaultMealStatusRow,
    updated_at: DateTime<Utc>,
}

impl SettingsRow {
    fn into_settings(self) -> GlobalSettings {
        GlobalSettings {
            weekend_policy: WeekendPolicy {
                friday_off: self.weekend_policy.friday_off,
                saturday_off: self.weekend_policy.saturday_off,
                odd_saturday_off: self.weekend_policy.odd_saturday_off,
                even_saturday_off: self.weekend_policy.even_saturday_off,
            },
            holiday_policy: HolidayPolicy {
                government_off: self.holiday_policy.government_off,
                optional_off: self.holiday_policy.optional_off,
                religious_off: self.holiday_policy.religious_off,
            },
            cutoff_times: CutoffTimes {
                lunch_hour: self.cutoff_times.lunch_hour,
                dinner_hour: self.cutoff_times.dinner_hour,
            },
            default_meal_status: DefaultMealStatus {
                lunch: self.default_meal_status.lunch,
                dinner: self.default_meal_status.dinner,
            },
            updated_at: self.updated_at,
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::Decode(e.to_string()))
}

/// SurrealDB implementation of the settings repository.
#[derive(Clone)]
pub struct SurrealSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SettingsRepository for SurrealSettingsRepository<C> {
    async fn get(&self) -> MealtrackResult<GlobalSettings> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('settings', $id)")
            .bind(("id", SETTINGS_ID.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(SettingsRow::into_settings)
            .unwrap_or_default())
    }

    async fn update(&self, input: UpdateGlobalSettings) -> MealtrackResult<GlobalSettings> {
        // Merge into the current (or default) value so a partial
        // update never leaves the singleton partially written.
        let current = self.get().await?;
        let merged = GlobalSettings {
            weekend_policy: input.weekend_policy.unwrap_or(current.weekend_policy),
            holiday_policy: input.holiday_policy.unwrap_or(current.holiday_policy),
            cutoff_times: input.cutoff_times.unwrap_or(current.cutoff_times),
            default_meal_status: input
                .default_meal_status
                .unwrap_or(current.default_meal_status),
            updated_at: current.updated_at,
        };

        let result = self
            .db
            .query(
                "UPSERT type::record('settings', $id) SET \
                 weekend_policy = $weekend_policy, \
                 holiday_policy = $holiday_policy, \
                 cutoff_times = $cutoff_times, \
                 default_meal_status = $default_meal_status, \
                 updated_at = time::now()",
            )
            .bind(("id", SETTINGS_ID.to_string()))
            .bind(("weekend_policy", to_json(&merged.weekend_policy)?))
            .bind(("holiday_policy", to_json(&merged.holiday_policy)?))
            .bind(("cutoff_times", to_json(&merged.cutoff_times)?))
            .bind(("default_meal_status", to_json(&merged.default_meal_status)?))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "settings".into(),
            id: SETTINGS_ID.into(),
        })?;

        Ok(row.into_settings())
    }
}
