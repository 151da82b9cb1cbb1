//! Schema migrations embedded from `migrations/`.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use identity_core::error::{AppError, ErrorKind};

/// Every migration shipped with this build, in version order.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply all pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(known = MIGRATOR.iter().count(), "Applying identity schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::StoreUnavailable,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!("Identity schema is up to date");
    Ok(())
}
