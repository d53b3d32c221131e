//! Month settings — the authoritative date window for a billing month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit month window and finalization lock.
///
/// When absent for a month, callers fall back to calendar-month
/// boundaries. Once finalized, regular users and managers are locked
/// out of mutating that month's data; admins retain access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSettings {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_finalized: bool,
}

impl MonthSettings {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertMonthSettings {
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
