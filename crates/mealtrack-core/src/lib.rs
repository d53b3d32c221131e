//! MEALTRACK Core — domain models, repository traits, and the
//! calendar/policy evaluator shared by all crates.

pub mod calendar;
pub mod error;
pub mod models;
pub mod repository;

pub use error::{MealtrackError, MealtrackResult};
