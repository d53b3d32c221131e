//! Rule overrides — administratively created rules that force a meal
//! ON or OFF for a date, range, or recurring pattern, at a priority
//! derived from the creator's role.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::meal::MealType;
use crate::models::role::Role;
use crate::models::status::StatusPriority;

/// Who an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTarget {
    /// Applies to everyone, including future users.
    Global,
    /// Applies to all currently enrolled users.
    AllUsers,
    /// Applies to one specific user.
    User(Uuid),
}

impl OverrideTarget {
    pub fn matches_user(&self, user_id: Uuid) -> bool {
        match self {
            OverrideTarget::Global | OverrideTarget::AllUsers => true,
            OverrideTarget::User(target) => *target == user_id,
        }
    }
}

/// Which meal types an override covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealScope {
    Lunch,
    Dinner,
    Both,
}

impl MealScope {
    pub fn covers(&self, meal_type: MealType) -> bool {
        match self {
            MealScope::Both => true,
            MealScope::Lunch => meal_type == MealType::Lunch,
            MealScope::Dinner => meal_type == MealType::Dinner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideAction {
    ForceOn,
    ForceOff,
}

/// Recurrence rule for `OverrideDates::Recurring`.
///
/// Weekdays use chrono's Monday-based numbering (1 = Monday ..
/// 7 = Sunday); month days are 1-based calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekly { weekdays: Vec<u32> },
    Monthly { month_days: Vec<u32> },
}

/// Date applicability of an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideDates {
    Single(NaiveDate),
    Range {
        start: NaiveDate,
        end: NaiveDate,
    },
    Recurring {
        start: NaiveDate,
        end: Option<NaiveDate>,
        pattern: RecurrencePattern,
    },
}

impl OverrideDates {
    /// Whether the override applies on the given calendar day.
    ///
    /// Ranges are inclusive on both ends. Recurring rules apply from
    /// `start` (until `end`, when present) on the days the pattern
    /// selects.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self {
            OverrideDates::Single(d) => *d == date,
            OverrideDates::Range { start, end } => *start <= date && date <= *end,
            OverrideDates::Recurring {
                start,
                end,
                pattern,
            } => {
                if date < *start {
                    return false;
                }
                if let Some(end) = end
                    && date > *end
                {
                    return false;
                }
                match pattern {
                    RecurrencePattern::Daily => true,
                    RecurrencePattern::Weekly { weekdays } => {
                        weekdays.contains(&date.weekday().number_from_monday())
                    }
                    RecurrencePattern::Monthly { month_days } => month_days.contains(&date.day()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub id: Uuid,
    pub target: OverrideTarget,
    pub dates: OverrideDates,
    pub meal_scope: MealScope,
    pub action: OverrideAction,
    /// Derived from the creator's role at creation time; immutable.
    pub priority: StatusPriority,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_by_role: Role,
    pub created_at: DateTime<Utc>,
}

impl RuleOverride {
    /// An override that is inactive or past its expiry is never
    /// applicable, regardless of any other field.
    pub fn is_applicable(&self, date: NaiveDate, meal_type: MealType, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.expires_at.is_none_or(|exp| exp > now)
            && self.meal_scope.covers(meal_type)
            && self.dates.applies_on(date)
    }
}

/// Input for override creation.
///
/// Carries no priority field: priority is always derived from
/// `created_by_role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRuleOverride {
    pub target: OverrideTarget,
    pub dates: OverrideDates,
    pub meal_scope: MealScope,
    pub action: OverrideAction,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_by_role: Role,
}

/// Partial override update. Priority and creator fields are absent on
/// purpose — they are immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRuleOverride {
    pub dates: Option<OverrideDates>,
    pub meal_scope: Option<MealScope>,
    pub action: Option<OverrideAction>,
    pub is_active: Option<bool>,
    /// `Some(Some(t))` = set, `Some(None)` = clear, `None` = no change.
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn single_date_applies_exactly() {
        let dates = OverrideDates::Single(d("2026-01-30"));
        assert!(dates.applies_on(d("2026-01-30")));
        assert!(!dates.applies_on(d("2026-01-29")));
        assert!(!dates.applies_on(d("2026-01-31")));
    }

    #[test]
    fn range_is_inclusive() {
        let dates = OverrideDates::Range {
            start: d("2026-01-10"),
            end: d("2026-01-20"),
        };
        assert!(dates.applies_on(d("2026-01-10")));
        assert!(dates.applies_on(d("2026-01-15")));
        assert!(dates.applies_on(d("2026-01-20")));
        assert!(!dates.applies_on(d("2026-01-09")));
        assert!(!dates.applies_on(d("2026-01-21")));
    }

    #[test]
    fn recurring_weekly_matches_weekday_set() {
        // Mondays (1) and Thursdays (4) from 2026-01-01, open-ended.
        let dates = OverrideDates::Recurring {
            start: d("2026-01-01"),
            end: None,
            pattern: RecurrencePattern::Weekly {
                weekdays: vec![1, 4],
            },
        };
        assert!(dates.applies_on(d("2026-01-05"))); // Monday
        assert!(dates.applies_on(d("2026-01-01"))); // Thursday
        assert!(!dates.applies_on(d("2026-01-06"))); // Tuesday
        // Before the window.
        assert!(!dates.applies_on(d("2025-12-29"))); // a Monday
    }

    #[test]
    fn recurring_monthly_respects_end() {
        let dates = OverrideDates::Recurring {
            start: d("2026-01-01"),
            end: Some(d("2026-02-28")),
            pattern: RecurrencePattern::Monthly {
                month_days: vec![1, 15],
            },
        };
        assert!(dates.applies_on(d("2026-01-15")));
        assert!(dates.applies_on(d("2026-02-01")));
        assert!(!dates.applies_on(d("2026-03-01"))); // past end
        assert!(!dates.applies_on(d("2026-01-14")));
    }

    #[test]
    fn meal_scope_coverage() {
        assert!(MealScope::Both.covers(MealType::Lunch));
        assert!(MealScope::Both.covers(MealType::Dinner));
        assert!(MealScope::Lunch.covers(MealType::Lunch));
        assert!(!MealScope::Lunch.covers(MealType::Dinner));
        assert!(!MealScope::Dinner.covers(MealType::Lunch));
    }

    #[test]
    fn inactive_or_expired_never_applicable() {
        let now = Utc::now();
        let base = RuleOverride {
            id: Uuid::new_v4(),
            target: OverrideTarget::Global,
            dates: OverrideDates::Single(d("2026-01-30")),
            meal_scope: MealScope::Both,
            action: OverrideAction::ForceOff,
            priority: StatusPriority::Admin,
            is_active: true,
            expires_at: None,
            created_by: Uuid::new_v4(),
            created_by_role: Role::Admin,
            created_at: now,
        };
        assert!(base.is_applicable(d("2026-01-30"), MealType::Lunch, now));

        let inactive = RuleOverride {
            is_active: false,
            ..base.clone()
        };
        assert!(!inactive.is_applicable(d("2026-01-30"), MealType::Lunch, now));

        let expired = RuleOverride {
            expires_at: Some(now - chrono::Duration::hours(1)),
            ..base
        };
        assert!(!expired.is_applicable(d("2026-01-30"), MealType::Lunch, now));
    }
}
