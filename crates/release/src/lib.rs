/**
 * Artifact repackaging.
 *  Copies a build artifact into a fresh resource and
 *  rewrites the version inside its plugin manifest.
 */
pub mod artifact;
/**
 * SQLite connection setup, migrations and the
 *  lookup queries the submission pipeline needs.
 */
pub mod database;
/**
 * Catalog tables and value types that make up
 *  a release: stages, flags, categories, permissions,
 *  API versions, licenses, dependencies and requirements.
 */
pub mod model;
/**
 * Writes a validated release and all of its child
 *  rows inside a single transaction.
 */
pub mod persist;
/**
 * Id-addressed, typed, expiring blob storage on disk.
 */
pub mod resource;
/**
 * The source control collaborator (GitHub) used for
 *  permission checks, file fetches, license tags and
 *  markdown rendering.
 */
pub mod source_control;
/**
 * Submission documents, the validator that turns them
 *  into release candidates, and the pipeline entry point.
 */
pub mod submit;

pub mod prelude {
    pub use crate::database::{Database, DatabaseSetupError};
    pub use crate::model::{ApiVersionTable, ReleaseCandidate, ReleaseFlags, ReleaseStage};
    pub use crate::resource::{ResourceError, ResourceStore, NULL_RESOURCE};
    pub use crate::source_control::{GitHubClient, MarkdownMode, SourceControl};
    pub use crate::submit::{ReleasePipeline, SubmitError, Submission, Submitted};
}
