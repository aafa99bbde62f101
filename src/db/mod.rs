use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;

/// Establish a pooled connection to the marketplace database.
///
/// In-memory `SQLite` URLs get a single connection so every query sees the same
/// database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if database_url.contains(":memory:") {
        // Closing the only connection would drop the database with it.
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(20)
            .min_connections(2)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800));
    }

    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Whether the store rejected a write because of a unique constraint.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
