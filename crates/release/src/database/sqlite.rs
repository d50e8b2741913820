use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use super::DatabaseSetupError;

pub(super) async fn connect_sqlite(url: &url::Url) -> Result<SqlitePool, DatabaseSetupError> {
    let in_memory = url.path().contains(":memory:");

    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .foreign_keys(true)
        // writers queue on the lock instead of failing with SQLITE_BUSY
        .busy_timeout(Duration::from_secs(5));

    // every connection to `:memory:` is its own database, so the pool must
    //  hold exactly one connection and never let it go
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options.journal_mode(SqliteJournalMode::Wal))
            .await
    }
    .map_err(DatabaseSetupError::Unavailable)?;

    Ok(pool)
}

pub(super) async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}
