//! Database-specific error types and conversions.

use mealtrack_core::error::MealtrackError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for MealtrackError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => MealtrackError::NotFound { entity, id },
            other => MealtrackError::Database(other.to_string()),
        }
    }
}
