//! Mealtrack server — application entry point.

use mealtrack_db::{DbConfig, DbManager};
use mealtrack_db::repository::{
    SurrealHolidayRepository, SurrealMealRepository, SurrealMonthSettingsRepository,
    SurrealOverrideRepository, SurrealSettingsRepository,
};
use mealtrack_engine::gate::GateService;
use mealtrack_engine::status::StatusService;
use tracing_subscriber::EnvFilter;

fn db_config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: std::env::var("MEALTRACK_DB_URL").unwrap_or(defaults.url),
        namespace: std::env::var("MEALTRACK_DB_NS").unwrap_or(defaults.namespace),
        database: std::env::var("MEALTRACK_DB_NAME").unwrap_or(defaults.database),
        username: std::env::var("MEALTRACK_DB_USER").unwrap_or(defaults.username),
        password: std::env::var("MEALTRACK_DB_PASS").unwrap_or(defaults.password),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mealtrack=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting mealtrack server...");

    let config = db_config_from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = manager.health().await {
        tracing::error!(error = %e, "SurrealDB health check failed");
        std::process::exit(1);
    }

    if let Err(e) = mealtrack_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Migration failed");
        std::process::exit(1);
    }

    let db = manager.client().clone();
    let _status_service = StatusService::new(
        SurrealSettingsRepository::new(db.clone()),
        SurrealHolidayRepository::new(db.clone()),
        SurrealMealRepository::new(db.clone()),
        SurrealOverrideRepository::new(db.clone()),
    );
    let _gate_service = GateService::new(
        SurrealSettingsRepository::new(db.clone()),
        SurrealMonthSettingsRepository::new(db),
    );

    // TODO: Start REST API server
    // TODO: Monthly billing summary endpoints

    tracing::info!("Mealtrack server stopped.");
}
