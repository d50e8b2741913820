use sqlx::Row;

use crate::database::Database;
use crate::model::ReleaseStage;

/// Everything the pipeline needs to know about the build being released
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub build_id: i64,
    pub repo_id: i64,
    pub project_id: i64,
    /// Project path inside the repository, with a trailing slash when non-empty
    pub path: String,
    pub sha: String,
    /// Resource holding the built artifact
    pub resource_id: i64,
}

/// The identity triple a self-referential dependency resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseIdentity {
    pub release_id: i64,
    pub name: String,
    pub version: String,
}

impl Database {
    /// Look up a build together with the project it belongs to
    pub async fn get_build_info(&self, build_id: i64) -> Result<Option<BuildInfo>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT p.repo_id, p.path, b.project_id, b.sha, b.resource_id
            FROM builds b
            INNER JOIN projects p ON b.project_id = p.project_id
            WHERE b.build_id = ?1
            "#,
        )
        .bind(build_id)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| BuildInfo {
            build_id,
            repo_id: r.get("repo_id"),
            project_id: r.get("project_id"),
            path: r.get("path"),
            sha: r.get("sha"),
            resource_id: r.get("resource_id"),
        }))
    }

    /// All version strings ever released for a project
    pub async fn get_project_versions(&self, project_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT version FROM releases WHERE project_id = ?1
            "#,
        )
        .bind(project_id)
        .fetch_all(&**self)
        .await?;

        Ok(rows.iter().map(|r| r.get("version")).collect())
    }

    /// Count checked releases (stage >= Restricted) whose name starts with `prefix`
    pub async fn count_checked_name_prefix(&self, prefix: &str) -> Result<i64, sqlx::Error> {
        let pattern = format!("{}%", escape_like(prefix));
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS dups
            FROM releases
            WHERE name LIKE ?1 ESCAPE '\' AND state >= ?2
            "#,
        )
        .bind(pattern)
        .bind(ReleaseStage::Restricted as i64)
        .fetch_one(&**self)
        .await?;

        Ok(row.get("dups"))
    }

    /// Resolve a release id to its name and version
    pub async fn get_release_identity(
        &self,
        release_id: i64,
    ) -> Result<Option<ReleaseIdentity>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT release_id, name, version FROM releases WHERE release_id = ?1
            "#,
        )
        .bind(release_id)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| ReleaseIdentity {
            release_id: r.get("release_id"),
            name: r.get("name"),
            version: r.get("version"),
        }))
    }
}

/// Plugin names may contain `_`, which LIKE would otherwise treat as a wildcard
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
