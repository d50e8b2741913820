use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use release::model::ApiVersionTable;
use release::source_control::MarkdownMode;

pub const APP_NAME: &str = "poggit";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const RESOURCES_DIR_NAME: &str = "resources";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// GitHub API base URL, for GitHub Enterprise deployments
    #[serde(default)]
    pub github_api_url: Option<Url>,
    /// How release articles are rendered
    #[serde(default)]
    pub markdown: MarkdownMode,
    /// Replaces the built-in PocketMine API version table, oldest first
    #[serde(default)]
    pub api_versions: Option<Vec<String>>,
}

fn default_api_port() -> u16 {
    5080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            github_api_url: None,
            markdown: MarkdownMode::default(),
            api_versions: None,
        }
    }
}

impl AppConfig {
    pub fn api_version_table(&self) -> ApiVersionTable {
        match &self.api_versions {
            Some(versions) => ApiVersionTable::new(versions.clone()),
            None => ApiVersionTable::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the poggit directory (~/.poggit)
    pub poggit_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Root of the resource store
    pub resources_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the poggit directory path (custom or default ~/.poggit)
    pub fn poggit_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new poggit state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let poggit_dir = Self::poggit_dir(custom_path)?;

        if poggit_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&poggit_dir)?;

        let resources_path = poggit_dir.join(RESOURCES_DIR_NAME);
        fs::create_dir_all(&resources_path)?;

        let config = config.unwrap_or_default();
        let config_path = poggit_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // schema is applied by the service on first connect
        let db_path = poggit_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            poggit_dir,
            db_path,
            resources_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the poggit directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let poggit_dir = Self::poggit_dir(custom_path)?;

        if !poggit_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = poggit_dir.join(DB_FILE_NAME);
        let resources_path = poggit_dir.join(RESOURCES_DIR_NAME);
        let config_path = poggit_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !resources_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", RESOURCES_DIR_NAME)));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            poggit_dir,
            db_path,
            resources_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("poggit directory not initialized. Run 'poggit init' first")]
    NotInitialized,

    #[error("poggit directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
