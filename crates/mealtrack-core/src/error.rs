//! Error types for the MEALTRACK system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MealtrackError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MealtrackResult<T> = Result<T, MealtrackError>;
