use reqwest::StatusCode;

use crate::artifact::RepackageError;
use crate::persist::PersistError;
use crate::resource::ResourceError;
use crate::source_control::SourceControlError;

/// Why a submission was rejected
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A field broke its contract; the message names the field
    #[error("{0}")]
    Validation(String),

    /// The actor may not release from this repository
    #[error("{0}")]
    Authorization(String),

    #[error("could not verify with source control: {0}")]
    Upstream(SourceControlError),

    #[error("build artifact {0} has already been deleted")]
    BuildArtifactGone(i64),

    /// The build artifact could not be repackaged
    #[error("could not prepare the release artifact: {0}")]
    Artifact(RepackageError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl SubmitError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SubmitError::Validation(message.into())
    }

    /// Translate a source control failure on a permission check. Statuses that
    /// mean "you can't see this" are an authorization problem, not an outage.
    pub(crate) fn from_permission_check(err: SourceControlError) -> Self {
        match err {
            SourceControlError::HttpStatus(status, _)
                if status == StatusCode::UNAUTHORIZED
                    || status == StatusCode::FORBIDDEN
                    || status == StatusCode::NOT_FOUND =>
            {
                SubmitError::Authorization("Admin access required for releasing plugins".into())
            }
            err => SubmitError::Upstream(err),
        }
    }
}

impl From<RepackageError> for SubmitError {
    fn from(err: RepackageError) -> Self {
        match err {
            RepackageError::BuildArtifactGone(id) => SubmitError::BuildArtifactGone(id),
            RepackageError::Resource(e) => SubmitError::Resource(e),
            err => SubmitError::Artifact(err),
        }
    }
}

impl From<PersistError> for SubmitError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::DuplicateVersion { .. } => SubmitError::Validation(err.to_string()),
            PersistError::Database(e) => SubmitError::Persistence(e),
        }
    }
}
