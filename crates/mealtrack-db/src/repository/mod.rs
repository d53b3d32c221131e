//! SurrealDB repository implementations.

mod holiday;
mod meal;
mod month;
mod override_rule;
mod settings;

pub use holiday::SurrealHolidayRepository;
pub use meal::SurrealMealRepository;
pub use month::SurrealMonthSettingsRepository;
pub use override_rule::SurrealOverrideRepository;
pub use settings::SurrealSettingsRepository;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::DbError;

/// Parse a stored `YYYY-MM-DD` civil date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    s.parse()
        .map_err(|e| DbError::Decode(format!("invalid date '{s}': {e}")))
}

/// Parse a stored UUID string.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid UUID '{s}': {e}")))
}
