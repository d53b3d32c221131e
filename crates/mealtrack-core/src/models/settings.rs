//! Global settings singleton.
//!
//! Exactly one active settings record exists; every policy field has a
//! documented default so reads never fail on absence. The resolver and
//! gate receive the loaded value explicitly — there is no ambient
//! static access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::meal::MealType;

/// Which weekend days are meal-off by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendPolicy {
    /// Friday is the weekly holiday (default: true).
    pub friday_off: bool,
    /// Every Saturday off (default: false).
    pub saturday_off: bool,
    /// Odd Saturdays of the month off (default: true).
    pub odd_saturday_off: bool,
    /// Even Saturdays of the month off (default: false).
    pub even_saturday_off: bool,
}

impl Default for WeekendPolicy {
    fn default() -> Self {
        Self {
            friday_off: true,
            saturday_off: false,
            odd_saturday_off: true,
            even_saturday_off: false,
        }
    }
}

/// Which holiday kinds force meals off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayPolicy {
    /// Government holidays off (default: true).
    pub government_off: bool,
    /// Optional holidays remain working days (default: false).
    pub optional_off: bool,
    /// Religious holidays off (default: true).
    pub religious_off: bool,
}

impl Default for HolidayPolicy {
    fn default() -> Self {
        Self {
            government_off: true,
            optional_off: false,
            religious_off: true,
        }
    }
}

/// Per-meal cutoff hours (hour-of-day, Bangladesh time).
///
/// A regular user may no longer toggle today's meal once the current
/// BD hour reaches the cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffTimes {
    pub lunch_hour: u32,
    pub dinner_hour: u32,
}

impl Default for CutoffTimes {
    fn default() -> Self {
        Self {
            lunch_hour: 10,
            dinner_hour: 16,
        }
    }
}

impl CutoffTimes {
    pub fn for_meal(&self, meal_type: MealType) -> u32 {
        match meal_type {
            MealType::Lunch => self.lunch_hour,
            MealType::Dinner => self.dinner_hour,
        }
    }
}

/// Default ON/OFF state per meal type when nothing else applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultMealStatus {
    pub lunch: bool,
    pub dinner: bool,
}

impl Default for DefaultMealStatus {
    fn default() -> Self {
        Self {
            lunch: true,
            dinner: true,
        }
    }
}

impl DefaultMealStatus {
    pub fn for_meal(&self, meal_type: MealType) -> bool {
        match meal_type {
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }
}

/// The one active settings record. Mutated only by admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub weekend_policy: WeekendPolicy,
    pub holiday_policy: HolidayPolicy,
    pub cutoff_times: CutoffTimes,
    pub default_meal_status: DefaultMealStatus,
    pub updated_at: DateTime<Utc>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            weekend_policy: WeekendPolicy::default(),
            holiday_policy: HolidayPolicy::default(),
            cutoff_times: CutoffTimes::default(),
            default_meal_status: DefaultMealStatus::default(),
            updated_at: Utc::now(),
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGlobalSettings {
    pub weekend_policy: Option<WeekendPolicy>,
    pub holiday_policy: Option<HolidayPolicy>,
    pub cutoff_times: Option<CutoffTimes>,
    pub default_meal_status: Option<DefaultMealStatus>,
}
