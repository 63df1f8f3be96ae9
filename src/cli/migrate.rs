use crate::config::{connect_database, migrate_database, BootstrapSettings};

/// Connect and apply every pending migration
///
/// Does not build AppData, so no secrets are required.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
