use std::sync::Arc;

use url::Url;

use release::prelude::*;
use release::source_control::SourceControlError;

use super::service_config::Config;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    pipeline: ReleasePipeline,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup resource store
        tokio::fs::create_dir_all(&config.resources_path).await?;
        let store = Arc::new(ResourceStore::new(
            database.clone(),
            config.resources_path.clone(),
        ));
        tracing::debug!(root = ?config.resources_path, "resource store ready");

        // 3. Setup source control
        let github = GitHubClient::new(config.github_api_url.as_ref(), config.markdown)?;

        let pipeline = ReleasePipeline::new(
            database.clone(),
            store,
            Arc::new(github),
            config.api_versions.clone(),
        );

        Ok(Self::from_parts(database, pipeline))
    }

    /// Assemble state from already constructed components
    pub fn from_parts(database: Database, pipeline: ReleasePipeline) -> Self {
        Self { database, pipeline }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn pipeline(&self) -> &ReleasePipeline {
        &self.pipeline
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),

    #[error("Resource store setup error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source control client error: {0}")]
    SourceControl(#[from] SourceControlError),
}
