//! Resource metadata stored in the `resources` table.

use sqlx::Row;

use super::error::Result;
use crate::database::Database;

/// Resource metadata row.
///
/// All fields are populated from the database row; some are only
/// accessed in tests but are part of the schema mapping.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub(crate) struct ResourceMetadata {
    pub resource_id: i64,
    pub kind: String,
    pub mime_type: String,
    pub access_filters: String,
    pub created_at: i64,
    pub duration: i64,
}

impl ResourceMetadata {
    /// Unix timestamp after which the resource is expired
    pub fn expires_at(&self) -> i64 {
        self.created_at.saturating_add(self.duration)
    }
}

impl Database {
    /// Insert a new resource record, returning its id.
    pub(crate) async fn insert_resource(
        &self,
        kind: &str,
        mime_type: &str,
        access_filters: &str,
        duration: i64,
    ) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO resources (type, mime_type, access_filters, created_at, duration)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(kind)
        .bind(mime_type)
        .bind(access_filters)
        .bind(now)
        .bind(duration)
        .execute(&**self)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get resource metadata by id.
    pub(crate) async fn get_resource(&self, resource_id: i64) -> Result<Option<ResourceMetadata>> {
        let row = sqlx::query(
            r#"
            SELECT resource_id, type, mime_type, access_filters, created_at, duration
            FROM resources
            WHERE resource_id = ?1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| ResourceMetadata {
            resource_id: r.get("resource_id"),
            kind: r.get("type"),
            mime_type: r.get("mime_type"),
            access_filters: r.get("access_filters"),
            created_at: r.get("created_at"),
            duration: r.get("duration"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get_resource() {
        let db = Database::in_memory().await.unwrap();

        let id = db
            .insert_resource("phar", "application/octet-stream", "[]", 60)
            .await
            .unwrap();
        // id 1 is the seeded null resource
        assert!(id > 1);

        let meta = db.get_resource(id).await.unwrap().unwrap();
        assert_eq!(meta.resource_id, id);
        assert_eq!(meta.kind, "phar");
        assert_eq!(meta.mime_type, "application/octet-stream");
        assert_eq!(meta.access_filters, "[]");
        assert_eq!(meta.expires_at(), meta.created_at + 60);

        assert!(db.get_resource(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let db = Database::in_memory().await.unwrap();
        let a = db.insert_resource("txt", "text/plain", "[]", 60).await.unwrap();
        let b = db.insert_resource("txt", "text/plain", "[]", 60).await.unwrap();
        assert!(b > a);
    }
}
