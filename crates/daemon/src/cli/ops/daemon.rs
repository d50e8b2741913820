use clap::Args;

use poggit_daemon::process::ServiceError;
use poggit_daemon::state::{AppState, StateError};
use poggit_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("daemon failed: {0}")]
    Failed(#[from] ServiceError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            api_port: self.api_port.unwrap_or(state.config.api_port),
            sqlite_path: Some(state.db_path.clone()),
            resources_path: state.resources_path.clone(),
            github_api_url: state.config.github_api_url.clone(),
            markdown: state.config.markdown,
            api_versions: state.config.api_version_table(),
            log_level: self.log_level,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
