//! Release submission.
//!
//! A [`Submission`] is validated field by field into a
//! [`ReleaseCandidate`](crate::model::ReleaseCandidate), which is then
//! persisted atomically. Validation stops at the first problem; the only
//! non-fatal outcome is a warning, returned alongside the new release id.

mod article;
mod document;
mod error;
mod icon;
mod validate;

use std::sync::Arc;

use crate::database::Database;
use crate::model::ApiVersionTable;
use crate::persist;
use crate::resource::ResourceStore;
use crate::source_control::SourceControl;

pub use article::MIN_ARTICLE_LENGTH;
pub use document::{
    Article, CategoriesInput, DependencyInput, LicenseInput, SpoonInput, Submission,
};
pub use error::SubmitError;
pub use icon::MAX_ICON_SIZE;
pub use validate::Validated;

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub release_id: i64,
    pub warnings: Vec<String>,
}

/// Everything a submission needs to be validated and stored
#[derive(Clone)]
pub struct ReleasePipeline {
    db: Database,
    store: Arc<ResourceStore>,
    scm: Arc<dyn SourceControl>,
    apis: ApiVersionTable,
}

impl ReleasePipeline {
    pub fn new(
        db: Database,
        store: Arc<ResourceStore>,
        scm: Arc<dyn SourceControl>,
        apis: ApiVersionTable,
    ) -> Self {
        Self {
            db,
            store,
            scm,
            apis,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Build a release candidate without persisting it. Resources for
    /// articles and the repackaged artifact are still created.
    pub async fn validate(
        &self,
        submission: &Submission,
        token: &str,
    ) -> Result<Validated, SubmitError> {
        validate::Validator {
            db: &self.db,
            store: &self.store,
            scm: self.scm.as_ref(),
            apis: &self.apis,
            token,
        }
        .validate(submission)
        .await
    }

    /// Validate and persist a submission on behalf of the actor owning `token`
    pub async fn submit(
        &self,
        submission: &Submission,
        token: &str,
    ) -> Result<Submitted, SubmitError> {
        let Validated {
            candidate,
            warnings,
        } = match self.validate(submission, token).await {
            Ok(validated) => validated,
            Err(e) => {
                tracing::info!(build_id = ?submission.build_id, error = %e, "submission rejected");
                return Err(e);
            }
        };

        let release_id = persist::persist(&self.db, &candidate).await?;
        Ok(Submitted {
            release_id,
            warnings,
        })
    }
}

impl std::fmt::Debug for ReleasePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasePipeline")
            .field("store", &self.store.root())
            .field("apis", &self.apis.len())
            .finish_non_exhaustive()
    }
}
