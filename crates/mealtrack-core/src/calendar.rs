//! Calendar/policy evaluator.
//!
//! Pure date arithmetic for the meal-status engine. All wall-clock
//! reasoning happens in a fixed UTC+6 offset (Bangladesh time),
//! never in the execution host's local time; instants are normalized
//! here, at the boundary, and everything downstream works on civil
//! dates.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc, Weekday};

use crate::models::holiday::{Holiday, HolidayKind};
use crate::models::settings::{HolidayPolicy, WeekendPolicy};
use crate::models::status::StatusSource;

/// Fixed UTC+6 offset used for all date arithmetic.
pub const BD_UTC_OFFSET_SECS: i32 = 6 * 3600;

fn bd_offset() -> FixedOffset {
    // Statically valid: 6h east is within chrono's accepted range.
    FixedOffset::east_opt(BD_UTC_OFFSET_SECS).unwrap()
}

/// The civil date in Bangladesh at the given instant.
pub fn today_in_bd(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&bd_offset()).date_naive()
}

/// The hour-of-day (0-23) in Bangladesh at the given instant.
pub fn bd_hour(now: DateTime<Utc>) -> u32 {
    now.with_timezone(&bd_offset()).hour()
}

pub fn is_friday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Fri
}

pub fn is_saturday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// The n-th Saturday of the month, computed as `ceil(day_of_month / 7)`.
///
/// Month-relative, not ISO-week-relative: the first Saturday of a
/// month is ordinal 1 no matter which ISO week it lands in.
pub fn saturday_ordinal(date: NaiveDate) -> Option<u32> {
    if is_saturday(date) {
        Some(date.day().div_ceil(7))
    } else {
        None
    }
}

pub fn is_odd_saturday(date: NaiveDate) -> bool {
    saturday_ordinal(date).is_some_and(|n| n % 2 == 1)
}

pub fn is_even_saturday(date: NaiveDate) -> bool {
    saturday_ordinal(date).is_some_and(|n| n % 2 == 0)
}

/// A system-default OFF verdict with its audit reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultOff {
    pub source: StatusSource,
    pub reason: String,
}

fn holiday_kind_off(policy: &HolidayPolicy, kind: HolidayKind) -> bool {
    match kind {
        HolidayKind::Government => policy.government_off,
        HolidayKind::Optional => policy.optional_off,
        HolidayKind::Religious => policy.religious_off,
    }
}

/// Evaluate whether the system default forces this day OFF.
///
/// Checks, in order: Friday, full Saturday, odd Saturday, even
/// Saturday, then the first stored holiday on that day whose kind the
/// policy turns off. First match wins; `None` means the default state
/// stands.
///
/// Holiday matching is day-granular and takes the first stored match;
/// callers pass `holidays` in storage order (`created_at` ascending)
/// so duplicates on one date resolve deterministically.
pub fn default_meal_off(
    date: NaiveDate,
    holidays: &[Holiday],
    weekend: &WeekendPolicy,
    holiday_policy: &HolidayPolicy,
) -> Option<DefaultOff> {
    if weekend.friday_off && is_friday(date) {
        return Some(DefaultOff {
            source: StatusSource::SystemFriday,
            reason: "weekly holiday (Friday)".into(),
        });
    }
    if weekend.saturday_off && is_saturday(date) {
        return Some(DefaultOff {
            source: StatusSource::SystemSaturday,
            reason: "weekly holiday (Saturday)".into(),
        });
    }
    if weekend.odd_saturday_off && is_odd_saturday(date) {
        return Some(DefaultOff {
            source: StatusSource::SystemOddSaturday,
            reason: "odd Saturday of the month".into(),
        });
    }
    if weekend.even_saturday_off && is_even_saturday(date) {
        return Some(DefaultOff {
            source: StatusSource::SystemEvenSaturday,
            reason: "even Saturday of the month".into(),
        });
    }

    holidays
        .iter()
        .find(|h| h.is_active && h.date == date && holiday_kind_off(holiday_policy, h.kind))
        .map(|h| DefaultOff {
            source: StatusSource::SystemHoliday,
            reason: format!("holiday: {}", h.name),
        })
}

/// Calendar-month window containing `date`, used as the fallback when
/// no explicit month settings exist.
pub fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let next_month_start = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let end = next_month_start
        .and_then(|d| d.pred_opt())
        .unwrap_or(date);
    (start, end)
}
