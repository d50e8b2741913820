use std::path::PathBuf;

use url::Url;

use release::model::ApiVersionTable;
use release::source_control::MarkdownMode;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    /// root directory of the resource store
    pub resources_path: PathBuf,

    // source control
    /// GitHub API base URL, defaults to the public API
    pub github_api_url: Option<Url>,
    pub markdown: MarkdownMode,
    pub api_versions: ApiVersionTable,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
