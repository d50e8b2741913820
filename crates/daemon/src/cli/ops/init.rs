use clap::Args;
use url::Url;

use poggit_daemon::state::{AppConfig, AppState, StateError};
use release::source_control::MarkdownMode;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5080)]
    pub api_port: u16,

    /// GitHub API base URL (defaults to https://api.github.com)
    #[arg(long)]
    pub github_api_url: Option<Url>,

    /// Render markdown locally instead of through the GitHub API
    #[arg(long)]
    pub local_markdown: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            github_api_url: self.github_api_url.clone(),
            markdown: if self.local_markdown {
                MarkdownMode::Local
            } else {
                MarkdownMode::Github
            },
            api_versions: None,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized poggit directory at: {}\n\
             - Database: {}\n\
             - Resources: {}\n\
             - Config: {}\n\
             - API port: {}",
            state.poggit_dir.display(),
            state.db_path.display(),
            state.resources_path.display(),
            state.config_path.display(),
            state.config.api_port,
        ))
    }
}
