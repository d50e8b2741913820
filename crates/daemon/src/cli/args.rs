pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "poggit")]
#[command(about = "Plugin release submission daemon and client")]
pub struct Args {
    /// Daemon API URL (defaults to localhost on the configured api_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the poggit config directory (defaults to ~/.poggit)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
