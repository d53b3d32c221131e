//! Effective meal-status resolution.
//!
//! Composes the system default, the user's manual toggle, and any
//! matching rule overrides into one effective status using strict
//! priority ordering: a layer only replaces the current result when
//! its priority *strictly* exceeds it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use mealtrack_core::calendar;
use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::holiday::Holiday;
use mealtrack_core::models::meal::{Meal, MealType};
use mealtrack_core::models::override_rule::{OverrideAction, RuleOverride};
use mealtrack_core::models::settings::GlobalSettings;
use mealtrack_core::models::status::{StatusPriority, StatusSource};
use mealtrack_core::repository::{
    HolidayRepository, MealRepository, OverrideRepository, SettingsRepository,
};

use crate::overrides;

/// The final ON/OFF + count decision for a user/date/meal-type.
///
/// `reason` is a required audit/display field, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveMealStatus {
    pub is_on: bool,
    pub count: u32,
    pub source: StatusSource,
    pub priority: StatusPriority,
    pub reason: String,
    pub override_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
}

/// Everything the pure resolution kernel needs, read fresh per call.
#[derive(Debug, Clone)]
pub struct ResolutionInputs<'a> {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub now: DateTime<Utc>,
    pub settings: &'a GlobalSettings,
    pub holidays: &'a [Holiday],
    pub manual_meal: Option<&'a Meal>,
    pub overrides: &'a [RuleOverride],
}

fn override_result(rule: &RuleOverride) -> EffectiveMealStatus {
    let is_on = matches!(rule.action, OverrideAction::ForceOn);
    let (source, creator) = match rule.priority {
        StatusPriority::Admin => (StatusSource::OverrideAdmin, "admin"),
        _ => (StatusSource::OverrideManager, "manager"),
    };
    EffectiveMealStatus {
        is_on,
        count: u32::from(is_on),
        source,
        priority: rule.priority,
        reason: format!(
            "forced {} by {creator} override",
            if is_on { "on" } else { "off" }
        ),
        override_id: Some(rule.id),
        meal_id: None,
    }
}

/// Resolve the effective status from already-loaded inputs.
///
/// Deterministic and side-effect free: identical inputs always yield
/// an identical result.
pub fn resolve_status(inputs: ResolutionInputs<'_>) -> EffectiveMealStatus {
    // 1. System default floor (priority 1): ON per settings unless the
    //    calendar/policy evaluator forces the day off.
    let default_on = inputs.settings.default_meal_status.for_meal(inputs.meal_type);
    let mut status = match calendar::default_meal_off(
        inputs.date,
        inputs.holidays,
        &inputs.settings.weekend_policy,
        &inputs.settings.holiday_policy,
    ) {
        Some(off) => EffectiveMealStatus {
            is_on: false,
            count: 0,
            source: off.source,
            priority: StatusPriority::System,
            reason: off.reason,
            override_id: None,
            meal_id: None,
        },
        None => EffectiveMealStatus {
            is_on: default_on,
            count: u32::from(default_on),
            source: StatusSource::SystemDefault,
            priority: StatusPriority::System,
            reason: "system default".into(),
            override_id: None,
            meal_id: None,
        },
    };

    // 2. User manual toggle (priority 2).
    if let Some(meal) = inputs.manual_meal
        && meal.is_manually_set
        && StatusPriority::UserManual > status.priority
    {
        status = EffectiveMealStatus {
            is_on: meal.is_on,
            count: meal.count,
            source: StatusSource::UserManual,
            priority: StatusPriority::UserManual,
            reason: "manually set by user".into(),
            override_id: None,
            meal_id: Some(meal.id),
        };
    }

    // 3. Rule overrides (priority 3/4): the first ranked override that
    //    applies to this date and strictly exceeds the current
    //    priority wins; scanning stops there, not at the global
    //    maximum.
    for rule in overrides::ranked(inputs.overrides) {
        if !rule.is_applicable(inputs.date, inputs.meal_type, inputs.now) {
            continue;
        }
        if rule.priority > status.priority {
            status = override_result(rule);
            break;
        }
    }

    status
}

/// Status resolution service.
///
/// Generic over repository implementations so the engine has no
/// dependency on the database crate.
pub struct StatusService<S, H, M, O> {
    settings_repo: S,
    holiday_repo: H,
    meal_repo: M,
    override_repo: O,
}

impl<S, H, M, O> StatusService<S, H, M, O>
where
    S: SettingsRepository,
    H: HolidayRepository,
    M: MealRepository,
    O: OverrideRepository,
{
    pub fn new(settings_repo: S, holiday_repo: H, meal_repo: M, override_repo: O) -> Self {
        Self {
            settings_repo,
            holiday_repo,
            meal_repo,
            override_repo,
        }
    }

    /// Resolve the effective status for (user, date, meal type).
    ///
    /// Reads all inputs fresh on every call; performs no caching and
    /// no writes.
    pub async fn effective_meal_status(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> MealtrackResult<EffectiveMealStatus> {
        let now = Utc::now();

        // 1. Policy inputs.
        let settings = self.settings_repo.get().await?;
        let holidays = self.holiday_repo.find_by_date(date).await?;

        // 2. Per-user layers.
        let manual = self.meal_repo.find_manual(user_id, date, meal_type).await?;
        let candidates = self
            .override_repo
            .find_candidates(user_id, meal_type, now)
            .await?;

        // 3. Pure resolution.
        let status = resolve_status(ResolutionInputs {
            date,
            meal_type,
            now,
            settings: &settings,
            holidays: &holidays,
            manual_meal: manual.as_ref(),
            overrides: &candidates,
        });

        debug!(
            %user_id,
            %date,
            meal_type = %meal_type,
            is_on = status.is_on,
            source = ?status.source,
            "Resolved meal status"
        );

        Ok(status)
    }
}
