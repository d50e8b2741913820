use sqlx::Row;

use crate::database::{Database, DatabaseConnection};
use crate::model::{ReleaseCandidate, META_PERMISSION};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("This version name has already been used for your plugin! ({version})")]
    DuplicateVersion { project_id: i64, version: String },

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for PersistError {
    fn from(err: sqlx::Error) -> Self {
        PersistError::Database(err)
    }
}

/// Write a release and every child row in one transaction. Either all rows
/// land or none do. Returns the new release id.
pub async fn persist(db: &Database, candidate: &ReleaseCandidate) -> Result<i64, PersistError> {
    // IMMEDIATE takes the write lock up front, so the version check below
    //  sees every release committed before us and no other writer can slip in
    let mut tx = db.begin_with("BEGIN IMMEDIATE").await?;

    // re-checked here: another submission may have taken the version since validation
    let taken = sqlx::query("SELECT 1 FROM releases WHERE project_id = ?1 AND version = ?2")
        .bind(candidate.project_id)
        .bind(&candidate.version)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(duplicate(candidate));
    }

    let release_id = match insert_release(&mut tx, candidate).await {
        Ok(id) => id,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(duplicate(candidate));
        }
        Err(e) => return Err(e.into()),
    };

    insert_children(&mut tx, release_id, candidate).await?;

    tx.commit().await?;
    tracing::info!(
        release_id,
        name = %candidate.name,
        version = %candidate.version,
        stage = %candidate.stage,
        "release persisted"
    );
    Ok(release_id)
}

fn duplicate(candidate: &ReleaseCandidate) -> PersistError {
    PersistError::DuplicateVersion {
        project_id: candidate.project_id,
        version: candidate.version.clone(),
    }
}

async fn insert_release(
    conn: &mut DatabaseConnection,
    candidate: &ReleaseCandidate,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO releases (
            name, short_desc, artifact, project_id, build_id, version,
            description, changelog, license, license_res, flags, creation, state, icon
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        RETURNING release_id
        "#,
    )
    .bind(&candidate.name)
    .bind(&candidate.short_desc)
    .bind(candidate.artifact_resource_id)
    .bind(candidate.project_id)
    .bind(candidate.build_id)
    .bind(&candidate.version)
    .bind(candidate.description_resource_id)
    .bind(candidate.change_log_resource_id)
    .bind(candidate.license.tag())
    .bind(candidate.license.resource_id())
    .bind(candidate.flags.bits())
    .bind(candidate.creation)
    .bind(candidate.stage as i64)
    .bind(candidate.icon_url.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    row.try_get("release_id")
}

async fn insert_children(
    conn: &mut DatabaseConnection,
    release_id: i64,
    candidate: &ReleaseCandidate,
) -> Result<(), sqlx::Error> {
    for dep in &candidate.dependencies {
        sqlx::query(
            "INSERT INTO release_deps (release_id, name, version, dep_rel_id, is_hard) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(release_id)
        .bind(&dep.name)
        .bind(&dep.version)
        .bind(dep.dependency_release_id)
        .bind(dep.is_hard)
        .execute(&mut *conn)
        .await?;
    }

    for perm in &candidate.permissions {
        sqlx::query("INSERT INTO release_meta (release_id, type, val) VALUES (?1, ?2, ?3)")
            .bind(release_id)
            .bind(META_PERMISSION)
            .bind(perm.to_string())
            .execute(&mut *conn)
            .await?;
    }

    for spoon in &candidate.spoons {
        sqlx::query("INSERT INTO release_spoons (release_id, since, till) VALUES (?1, ?2, ?3)")
            .bind(release_id)
            .bind(spoon.since as i64)
            .bind(spoon.till as i64)
            .execute(&mut *conn)
            .await?;
    }

    for reqr in &candidate.requirements {
        sqlx::query(
            "INSERT INTO release_reqr (release_id, type, details, is_require) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(release_id)
        .bind(reqr.kind.code())
        .bind(&reqr.details)
        .bind(reqr.is_require)
        .execute(&mut *conn)
        .await?;
    }

    for (i, category) in candidate.categories.iter().enumerate() {
        sqlx::query(
            "INSERT INTO release_categories (release_id, category, is_major) VALUES (?1, ?2, ?3)",
        )
        .bind(release_id)
        .bind(*category as i64)
        .bind(i == 0)
        .execute(&mut *conn)
        .await?;
    }

    for word in candidate.keywords.iter().filter(|w| !w.is_empty()) {
        sqlx::query("INSERT INTO release_keywords (release_id, word) VALUES (?1, ?2)")
            .bind(release_id)
            .bind(word)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
