use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL comes from the settings, which already folded in `DATABASE_URL` from the
/// environment / `.env` file.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to the database."
    );
    Ok(pool)
}
