use std::path::PathBuf;

use clap::Args;

use poggit_daemon::http_server::api::client::ApiError;
use poggit_daemon::http_server::api::v0::SubmitReleaseRequest;
use release::prelude::Submission;

#[derive(Args, Debug, Clone)]
pub struct Submit {
    /// Submission document (JSON)
    pub file: PathBuf,

    /// GitHub token of the submitting user
    #[arg(long, env = "POGGIT_TOKEN")]
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("could not read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("invalid submission document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("submission failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Submit {
    type Error = SubmitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let document = tokio::fs::read_to_string(&self.file)
            .await
            .map_err(|e| SubmitError::Read(self.file.clone(), e))?;
        let submission: Submission = serde_json::from_str(&document)?;

        let response = ctx
            .client
            .call(SubmitReleaseRequest {
                token: self.token.clone(),
                submission,
            })
            .await?;

        let mut lines = vec![format!("Created release {}", response.release_id)];
        lines.extend(response.warnings.iter().map(|w| format!("  warning: {}", w)));
        Ok(lines.join("\n"))
    }
}
