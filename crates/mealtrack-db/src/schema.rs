//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs and civil dates are stored as strings (dates as `YYYY-MM-DD`
//! so lexicographic comparison matches date order). Enums are stored
//! as strings with ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Global settings (singleton, record id 'global')
-- =======================================================================
DEFINE TABLE settings SCHEMAFULL;
DEFINE FIELD weekend_policy ON TABLE settings TYPE object;
DEFINE FIELD weekend_policy.friday_off ON TABLE settings TYPE bool \
    DEFAULT true;
DEFINE FIELD weekend_policy.saturday_off ON TABLE settings TYPE bool \
    DEFAULT false;
DEFINE FIELD weekend_policy.odd_saturday_off ON TABLE settings \
    TYPE bool DEFAULT true;
DEFINE FIELD weekend_policy.even_saturday_off ON TABLE settings \
    TYPE bool DEFAULT false;
DEFINE FIELD holiday_policy ON TABLE settings TYPE object;
DEFINE FIELD holiday_policy.government_off ON TABLE settings TYPE bool \
    DEFAULT true;
DEFINE FIELD holiday_policy.optional_off ON TABLE settings TYPE bool \
    DEFAULT false;
DEFINE FIELD holiday_policy.religious_off ON TABLE settings TYPE bool \
    DEFAULT true;
DEFINE FIELD cutoff_times ON TABLE settings TYPE object;
DEFINE FIELD cutoff_times.lunch_hour ON TABLE settings TYPE int \
    DEFAULT 10;
DEFINE FIELD cutoff_times.dinner_hour ON TABLE settings TYPE int \
    DEFAULT 16;
DEFINE FIELD default_meal_status ON TABLE settings TYPE object;
DEFINE FIELD default_meal_status.lunch ON TABLE settings TYPE bool \
    DEFAULT true;
DEFINE FIELD default_meal_status.dinner ON TABLE settings TYPE bool \
    DEFAULT true;
DEFINE FIELD updated_at ON TABLE settings TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Holidays (day-granular calendar entries)
-- =======================================================================
DEFINE TABLE holiday SCHEMAFULL;
DEFINE FIELD date ON TABLE holiday TYPE string;
DEFINE FIELD name ON TABLE holiday TYPE string;
DEFINE FIELD name_bn ON TABLE holiday TYPE string;
DEFINE FIELD kind ON TABLE holiday TYPE string \
    ASSERT $value IN ['government', 'optional', 'religious'];
DEFINE FIELD is_active ON TABLE holiday TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE holiday TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_holiday_date ON TABLE holiday COLUMNS date;

-- =======================================================================
-- Manual meal records (one per user/date/meal type)
-- =======================================================================
DEFINE TABLE meal SCHEMAFULL;
DEFINE FIELD user_id ON TABLE meal TYPE string;
DEFINE FIELD date ON TABLE meal TYPE string;
DEFINE FIELD meal_type ON TABLE meal TYPE string \
    ASSERT $value IN ['lunch', 'dinner'];
DEFINE FIELD is_on ON TABLE meal TYPE bool;
DEFINE FIELD count ON TABLE meal TYPE int DEFAULT 1;
DEFINE FIELD is_manually_set ON TABLE meal TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE meal TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE meal TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_meal_user_date_type ON TABLE meal \
    COLUMNS user_id, date, meal_type UNIQUE;

-- =======================================================================
-- Rule overrides
-- =======================================================================
DEFINE TABLE rule_override SCHEMAFULL;
DEFINE FIELD target_type ON TABLE rule_override TYPE string \
    ASSERT $value IN ['global', 'all_users', 'user'];
DEFINE FIELD target_user ON TABLE rule_override TYPE option<string>;
DEFINE FIELD date_type ON TABLE rule_override TYPE string \
    ASSERT $value IN ['single', 'range', 'recurring'];
DEFINE FIELD start_date ON TABLE rule_override TYPE string;
DEFINE FIELD end_date ON TABLE rule_override TYPE option<string>;
DEFINE FIELD recurring_pattern ON TABLE rule_override \
    TYPE option<string>;
DEFINE FIELD recurring_days ON TABLE rule_override TYPE option<array>;
DEFINE FIELD meal_scope ON TABLE rule_override TYPE string \
    ASSERT $value IN ['lunch', 'dinner', 'both'];
DEFINE FIELD action ON TABLE rule_override TYPE string \
    ASSERT $value IN ['force_on', 'force_off'];
DEFINE FIELD priority ON TABLE rule_override TYPE int \
    ASSERT $value IN [3, 4];
DEFINE FIELD is_active ON TABLE rule_override TYPE bool DEFAULT true;
DEFINE FIELD expires_at ON TABLE rule_override TYPE option<datetime>;
DEFINE FIELD created_by ON TABLE rule_override TYPE string;
DEFINE FIELD created_by_role ON TABLE rule_override TYPE string \
    ASSERT $value IN ['manager', 'admin', 'super_admin'];
DEFINE FIELD created_at ON TABLE rule_override TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_override_active ON TABLE rule_override \
    COLUMNS is_active;
DEFINE INDEX idx_override_target_user ON TABLE rule_override \
    COLUMNS target_user;

-- =======================================================================
-- Month settings (explicit month windows + finalization lock)
-- =======================================================================
DEFINE TABLE month_settings SCHEMAFULL;
DEFINE FIELD year ON TABLE month_settings TYPE int;
DEFINE FIELD month ON TABLE month_settings TYPE int \
    ASSERT $value >= 1 AND $value <= 12;
DEFINE FIELD start_date ON TABLE month_settings TYPE string;
DEFINE FIELD end_date ON TABLE month_settings TYPE string;
DEFINE FIELD is_finalized ON TABLE month_settings TYPE bool \
    DEFAULT false;
DEFINE INDEX idx_month_settings_ym ON TABLE month_settings \
    COLUMNS year, month UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
