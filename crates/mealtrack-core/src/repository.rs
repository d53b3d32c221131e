//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The engine consumes these as
//! black boxes: it performs no retries and no local fallback, and it
//! propagates collaborator failures unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::MealtrackResult;
use crate::models::{
    holiday::{CreateHoliday, Holiday},
    meal::{Meal, MealType, UpsertMeal},
    month::{MonthSettings, UpsertMonthSettings},
    override_rule::{CreateRuleOverride, RuleOverride, UpdateRuleOverride},
    settings::{GlobalSettings, UpdateGlobalSettings},
};

// ---------------------------------------------------------------------------
// Global settings (singleton)
// ---------------------------------------------------------------------------

pub trait SettingsRepository: Send + Sync {
    /// Returns the active settings record, fully defaulted — never a
    /// partial object. Absence of a stored record is not an error.
    fn get(&self) -> impl Future<Output = MealtrackResult<GlobalSettings>> + Send;

    /// Merge a partial update into the singleton. Admin-only at the
    /// caller level.
    fn update(
        &self,
        input: UpdateGlobalSettings,
    ) -> impl Future<Output = MealtrackResult<GlobalSettings>> + Send;
}

// ---------------------------------------------------------------------------
// Holidays
// ---------------------------------------------------------------------------

pub trait HolidayRepository: Send + Sync {
    fn create(&self, input: CreateHoliday) -> impl Future<Output = MealtrackResult<Holiday>> + Send;

    /// Active holidays on exactly this day, in storage order
    /// (`created_at` ascending — the documented duplicate tie-break).
    fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = MealtrackResult<Vec<Holiday>>> + Send;

    /// Active holidays within `[from, to]` inclusive.
    fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = MealtrackResult<Vec<Holiday>>> + Send;

    fn deactivate(&self, id: Uuid) -> impl Future<Output = MealtrackResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Manual meal records
// ---------------------------------------------------------------------------

pub trait MealRepository: Send + Sync {
    /// The manually-set record for (user, date, meal type), if any.
    /// Never returns records with `is_manually_set = false`.
    fn find_manual(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> impl Future<Output = MealtrackResult<Option<Meal>>> + Send;

    /// Create-or-replace the manual record. This is the serialization
    /// point for concurrent toggles of the same (user, date, meal).
    fn upsert_manual(&self, input: UpsertMeal)
    -> impl Future<Output = MealtrackResult<Meal>> + Send;

    /// Administrative reset: remove the manual record so the system
    /// default applies again.
    fn reset(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> impl Future<Output = MealtrackResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Rule overrides
// ---------------------------------------------------------------------------

pub trait OverrideRepository: Send + Sync {
    /// Fails with a validation error when the creator role cannot
    /// carry an override priority (regular users).
    fn create(
        &self,
        input: CreateRuleOverride,
    ) -> impl Future<Output = MealtrackResult<RuleOverride>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = MealtrackResult<RuleOverride>> + Send;

    /// Candidate overrides for a user and meal type: active, not
    /// expired at `now`, scope covering the meal type, and targeting
    /// global / all users / this user.
    ///
    /// Sorted `priority DESC, created_at DESC`. The ordering is a
    /// documented contract: the resolver takes the first entry that
    /// beats the current priority, so recency breaks ties.
    fn find_candidates(
        &self,
        user_id: Uuid,
        meal_type: MealType,
        now: DateTime<Utc>,
    ) -> impl Future<Output = MealtrackResult<Vec<RuleOverride>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateRuleOverride,
    ) -> impl Future<Output = MealtrackResult<RuleOverride>> + Send;

    fn deactivate(&self, id: Uuid) -> impl Future<Output = MealtrackResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Month settings
// ---------------------------------------------------------------------------

pub trait MonthSettingsRepository: Send + Sync {
    /// The explicit window for (year, month), or `None` when the
    /// caller should fall back to calendar-month boundaries.
    fn find(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = MealtrackResult<Option<MonthSettings>>> + Send;

    fn upsert(
        &self,
        input: UpsertMonthSettings,
    ) -> impl Future<Output = MealtrackResult<MonthSettings>> + Send;

    /// Lock the month. Admin-only at the caller level.
    fn finalize(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = MealtrackResult<MonthSettings>> + Send;
}
