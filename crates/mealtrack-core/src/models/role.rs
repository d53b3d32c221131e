//! Actor roles.
//!
//! Roles are a closed sum type; every permission decision in the gate
//! and every override priority derivation dispatches on this enum
//! rather than on role strings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MealtrackError;
use crate::models::status::StatusPriority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether this role has administrative access (finalized months,
    /// global overrides, out-of-window edits).
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Priority an override created by this role carries.
    ///
    /// Assigned once at creation time and immutable thereafter.
    /// Regular users cannot create overrides at all.
    pub fn override_priority(&self) -> Option<StatusPriority> {
        match self {
            Role::User => None,
            Role::Manager => Some(StatusPriority::Manager),
            Role::Admin | Role::SuperAdmin => Some(StatusPriority::Admin),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl FromStr for Role {
    type Err = MealtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(MealtrackError::Validation {
                message: format!("unknown role: {other}"),
            }),
        }
    }
}
