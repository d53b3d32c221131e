//! Status priority levels and resolution sources.

use serde::{Deserialize, Serialize};

/// Priority of a status layer, ascending in strength.
///
/// The resolver only replaces the current effective status when a
/// candidate's priority *strictly* exceeds it, so the `Ord` impl here
/// is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StatusPriority {
    System = 1,
    UserManual = 2,
    Manager = 3,
    Admin = 4,
}

impl StatusPriority {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(StatusPriority::System),
            2 => Some(StatusPriority::UserManual),
            3 => Some(StatusPriority::Manager),
            4 => Some(StatusPriority::Admin),
            _ => None,
        }
    }
}

/// Where a resolved meal status came from.
///
/// Serialized snake_case so the wire values match the legacy API
/// (`system_friday`, `user_manual`, `override_manager`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    SystemDefault,
    SystemFriday,
    SystemSaturday,
    SystemOddSaturday,
    SystemEvenSaturday,
    SystemHoliday,
    UserManual,
    OverrideManager,
    OverrideAdmin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering_is_strict() {
        assert!(StatusPriority::System < StatusPriority::UserManual);
        assert!(StatusPriority::UserManual < StatusPriority::Manager);
        assert!(StatusPriority::Manager < StatusPriority::Admin);
        // Equal priorities never exceed each other.
        assert!(!(StatusPriority::Admin > StatusPriority::Admin));
    }

    #[test]
    fn priority_round_trip() {
        for p in [
            StatusPriority::System,
            StatusPriority::UserManual,
            StatusPriority::Manager,
            StatusPriority::Admin,
        ] {
            assert_eq!(StatusPriority::from_u8(p.as_u8()), Some(p));
        }
        assert_eq!(StatusPriority::from_u8(0), None);
        assert_eq!(StatusPriority::from_u8(5), None);
    }

    #[test]
    fn sources_serialize_snake_case() {
        let json = serde_json::to_string(&StatusSource::SystemFriday).unwrap();
        assert_eq!(json, "\"system_friday\"");
        let json = serde_json::to_string(&StatusSource::OverrideManager).unwrap();
        assert_eq!(json, "\"override_manager\"");
    }
}
