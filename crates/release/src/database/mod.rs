mod release_queries;
mod sqlite;

use std::ops::Deref;

use sqlx::SqlitePool;

pub use release_queries::{BuildInfo, ReleaseIdentity};

#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

pub type DatabaseConnection = sqlx::SqliteConnection;

impl Database {
    pub async fn connect(database_url: &url::Url) -> Result<Self, DatabaseSetupError> {
        if database_url.scheme() == "sqlite" {
            let db = sqlite::connect_sqlite(database_url).await?;
            sqlite::migrate_sqlite(&db).await?;
            return Ok(Database::new(db));
        }

        Err(DatabaseSetupError::UnknownDbType(
            database_url.scheme().to_string(),
        ))
    }

    /// Connect to a fresh in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, DatabaseSetupError> {
        let url = url::Url::parse("sqlite::memory:").map_err(DatabaseSetupError::InvalidUrl)?;
        Self::connect(&url).await
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    /// Cheap liveness probe used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&**self).await?;
        Ok(())
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("database url could not be parsed: {0}")]
    InvalidUrl(url::ParseError),

    #[error("requested database type was not recognized: {0}")]
    UnknownDbType(String),
}
