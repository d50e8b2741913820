//! Source control collaborator.
//!
//! The pipeline only ever talks to source control through [`SourceControl`],
//! so tests can swap GitHub out for an in-process fake.

mod github;
mod markdown;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub use github::GitHubClient;
pub use markdown::render_gfm;

/// Repository metadata, as seen by the actor whose token was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub id: i64,
    pub full_name: String,
    /// Whether the actor has administrative rights on the repository
    pub admin: bool,
}

/// A file fetched from a repository at a specific commit
#[derive(Debug, Clone)]
pub struct RepoFile {
    pub path: String,
    pub download_url: Option<String>,
    pub content: Vec<u8>,
}

/// How rich-text articles are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkdownMode {
    /// The GitHub markdown API, with the repository as context
    #[default]
    Github,
    /// Local rendering, for deployments without API access
    Local,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceControlError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("invalid file content: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("not found: {0}")]
    NotFound(String),
}

impl SourceControlError {
    pub fn is_not_found(&self) -> bool {
        match self {
            SourceControlError::NotFound(_) => true,
            SourceControlError::HttpStatus(status, _) => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

#[async_trait::async_trait]
pub trait SourceControl: Send + Sync {
    /// Fetch a repository by id, including the actor's permissions on it
    async fn repository(&self, repo_id: i64, token: &str) -> Result<RepoInfo, SourceControlError>;

    /// Fetch a file's content at a commit
    async fn file_at(
        &self,
        repo_full_name: &str,
        path: &str,
        sha: &str,
        token: &str,
    ) -> Result<RepoFile, SourceControlError>;

    /// Keys of every license known to source control, e.g. `mit`
    async fn license_keys(&self, token: &str) -> Result<Vec<String>, SourceControlError>;

    /// Render GitHub-flavoured markdown to HTML. `context` is the repository
    /// full name, used to resolve issue references and relative links.
    async fn render_markdown(
        &self,
        text: &str,
        context: &str,
        token: &str,
    ) -> Result<String, SourceControlError>;
}
