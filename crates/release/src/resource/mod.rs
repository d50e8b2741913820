//! Resource store.
//!
//! A resource is a typed blob addressed by an integer id. Metadata lives in
//! the `resources` table; content lives on disk under
//! `<root>/<id / 1000>/<id>.<type>`. Resources are immutable once written:
//! callers that need a modified copy create a new resource.
//!
//! Expiry is advisory and only enforced when a resource is resolved.

mod database;
mod error;
mod storage;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;

use crate::database::Database;

pub use error::{ResourceError, Result};
use storage::Storage;

/// The permanent "no resource" sentinel. Never resolves to a file.
pub const NULL_RESOURCE: i64 = 1;

/// Ten years
pub const DEFAULT_DURATION: Duration = Duration::from_secs(315_360_000);

/// A freshly allocated resource. The caller must write its content to
/// `path` before handing `id` to anyone else.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub id: i64,
    pub path: PathBuf,
}

/// Type and expiry remembered after the first metadata lookup
#[derive(Debug, Clone)]
struct CachedResource {
    kind: String,
    expires_at: i64,
}

#[derive(Debug)]
pub struct ResourceStore {
    db: Database,
    storage: Storage,
    cache: Mutex<HashMap<i64, CachedResource>>,
}

impl ResourceStore {
    pub fn new(db: Database, root: impl Into<PathBuf>) -> Self {
        Self {
            db,
            storage: Storage::new(root),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    /// Allocate a resource with the default ten year duration.
    pub async fn create(
        &self,
        kind: &str,
        mime_type: &str,
        access_filters: &[serde_json::Value],
    ) -> Result<NewResource> {
        self.create_with_duration(kind, mime_type, access_filters, DEFAULT_DURATION)
            .await
    }

    /// Allocate a resource id and return the path its content must be written to.
    pub async fn create_with_duration(
        &self,
        kind: &str,
        mime_type: &str,
        access_filters: &[serde_json::Value],
        duration: Duration,
    ) -> Result<NewResource> {
        let filters = serde_json::to_string(access_filters)?;
        let duration = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        let id = self
            .db
            .insert_resource(kind, mime_type, &filters, duration)
            .await?;
        let path = self.storage.prepare_path(id, kind).await?;
        tracing::debug!(resource_id = id, kind, "created resource");
        Ok(NewResource { id, path })
    }

    /// Allocate a resource and write `contents` to it in one go.
    pub async fn store(
        &self,
        kind: &str,
        mime_type: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<i64> {
        let resource = self.create(kind, mime_type, &[]).await?;
        tokio::fs::write(&resource.path, contents).await?;
        Ok(resource.id)
    }

    /// Resolve a resource id to the path of its content.
    ///
    /// Expiry is checked on every call, cached or not. A non-empty
    /// `expected_type` must match the stored type.
    pub async fn resolve(&self, id: i64, expected_type: Option<&str>) -> Result<PathBuf> {
        if id == NULL_RESOURCE {
            return Err(ResourceError::NotFound(id));
        }

        let cached = self.cache.lock().get(&id).cloned();
        let entry = match cached {
            Some(entry) => entry,
            None => {
                let meta = self
                    .db
                    .get_resource(id)
                    .await?
                    .ok_or(ResourceError::NotFound(id))?;
                let entry = CachedResource {
                    kind: meta.kind.clone(),
                    expires_at: meta.expires_at(),
                };
                self.cache.lock().insert(id, entry.clone());
                entry
            }
        };
        check_expiry(id, entry.expires_at)?;
        if matches!(expected_type, Some(kind) if !kind.is_empty() && kind != entry.kind) {
            return Err(ResourceError::NotFound(id));
        }
        let kind = entry.kind;

        let path = self.storage.path_for(id, &kind);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Ok(path),
            _ => Err(ResourceError::NotFound(id)),
        }
    }
}

fn check_expiry(id: i64, expires_at: i64) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    if expires_at < now {
        return Err(ResourceError::Expired {
            id,
            overdue_secs: now - expires_at,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (ResourceStore, tempfile::TempDir) {
        let db = Database::in_memory().await.unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        (ResourceStore::new(db, temp_dir.path()), temp_dir)
    }

    async fn backdate(store: &ResourceStore, id: i64, secs: i64) {
        sqlx::query("UPDATE resources SET created_at = created_at - ?1 WHERE resource_id = ?2")
            .bind(secs)
            .bind(id)
            .execute(&*store.db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let (store, temp_dir) = setup().await;

        let id = store.store("txt", "text/plain", b"hello").await.unwrap();
        let path = store.resolve(id, None).await.unwrap();

        assert!(path.starts_with(temp_dir.path()));
        assert_eq!(path.file_name().unwrap(), format!("{}.txt", id).as_str());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_null_resource_never_resolves() {
        let (store, _temp_dir) = setup().await;
        assert!(matches!(
            store.resolve(NULL_RESOURCE, None).await,
            Err(ResourceError::NotFound(NULL_RESOURCE))
        ));
        assert!(matches!(
            store.resolve(NULL_RESOURCE, Some("phar")).await,
            Err(ResourceError::NotFound(NULL_RESOURCE))
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_and_missing_file() {
        let (store, _temp_dir) = setup().await;
        assert!(matches!(
            store.resolve(999, None).await,
            Err(ResourceError::NotFound(999))
        ));

        // record exists but nothing was ever written
        let resource = store.create("phar", "application/octet-stream", &[]).await.unwrap();
        assert!(matches!(
            store.resolve(resource.id, None).await,
            Err(ResourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_resource_with_file_present() {
        let (store, _temp_dir) = setup().await;

        let resource = store
            .create_with_duration("txt", "text/plain", &[], Duration::from_secs(60))
            .await
            .unwrap();
        tokio::fs::write(&resource.path, b"stale").await.unwrap();
        backdate(&store, resource.id, 3600).await;

        match store.resolve(resource.id, None).await {
            Err(ResourceError::Expired { id, overdue_secs }) => {
                assert_eq!(id, resource.id);
                assert!(overdue_secs >= 3540);
            }
            other => panic!("expected expiry, got {:?}", other),
        }
        assert!(resource.path.exists());
    }

    #[tokio::test]
    async fn test_cache_keeps_enforcing_expiry() {
        let (store, _temp_dir) = setup().await;

        let resource = store
            .create_with_duration("txt", "text/plain", &[], Duration::from_secs(60))
            .await
            .unwrap();
        tokio::fs::write(&resource.path, b"fresh").await.unwrap();

        // first resolve populates the cache
        store.resolve(resource.id, None).await.unwrap();

        // expire the cached entry in place, as if time had passed
        store
            .cache
            .lock()
            .get_mut(&resource.id)
            .unwrap()
            .expires_at -= 3600;

        assert!(matches!(
            store.resolve(resource.id, None).await,
            Err(ResourceError::Expired { .. })
        ));
        assert!(matches!(
            store.resolve(resource.id, Some("txt")).await,
            Err(ResourceError::Expired { .. })
        ));
    }

    #[tokio::test]
    async fn test_expected_type_must_match() {
        let (store, _temp_dir) = setup().await;
        let id = store.store("phar", "application/octet-stream", b"PK").await.unwrap();

        assert!(matches!(
            store.resolve(id, Some("zip")).await,
            Err(ResourceError::NotFound(_))
        ));
        assert!(store.resolve(id, Some("phar")).await.is_ok());
        assert!(store.resolve(id, Some("")).await.is_ok());
    }
}
