//! Holiday calendar entries.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MealtrackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Government,
    Optional,
    Religious,
}

impl HolidayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayKind::Government => "government",
            HolidayKind::Optional => "optional",
            HolidayKind::Religious => "religious",
        }
    }
}

impl FromStr for HolidayKind {
    type Err = MealtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "government" => Ok(HolidayKind::Government),
            "optional" => Ok(HolidayKind::Optional),
            "religious" => Ok(HolidayKind::Religious),
            other => Err(MealtrackError::Validation {
                message: format!("unknown holiday kind: {other}"),
            }),
        }
    }
}

/// A holiday on a single calendar day.
///
/// Matching is day-granular: any time-of-day is truncated away before
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    /// Bengali display name.
    pub name_bn: String,
    pub kind: HolidayKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub name_bn: String,
    pub kind: HolidayKind,
}
