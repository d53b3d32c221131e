//! Manual meal toggle records.
//!
//! A `Meal` row exists only when a user or manager explicitly toggled
//! that day; absence means "defer to the system default".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MealtrackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = MealtrackError;

    /// Fails fast on unknown meal types; no silent coercion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(MealtrackError::Validation {
                message: format!("unknown meal type: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub is_on: bool,
    pub count: u32,
    pub is_manually_set: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the gate-checked manual toggle upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertMeal {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub is_on: bool,
    pub count: u32,
}
