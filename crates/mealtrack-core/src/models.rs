//! Domain models for MEALTRACK.
//!
//! These are the core types shared across all crates.

pub mod holiday;
pub mod meal;
pub mod month;
pub mod override_rule;
pub mod role;
pub mod settings;
pub mod status;
