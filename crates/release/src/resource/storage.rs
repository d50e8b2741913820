//! On-disk layout of resource files.

use std::path::{Path, PathBuf};

use super::error::Result;

/// Resources per bucket directory
const BUCKET_SIZE: i64 = 1000;

/// Root directory holding resource files, bucketed by `id / 1000`.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path for a resource; does not touch the filesystem.
    pub fn path_for(&self, resource_id: i64, kind: &str) -> PathBuf {
        let bucket = resource_id / BUCKET_SIZE;
        self.root
            .join(bucket.to_string())
            .join(format!("{}.{}", resource_id, kind))
    }

    /// Path for a resource, creating its bucket directory on demand.
    pub async fn prepare_path(&self, resource_id: i64, kind: &str) -> Result<PathBuf> {
        let path = self.path_for(resource_id, kind);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucketing() {
        let storage = Storage::new("/srv/resources");
        assert_eq!(
            storage.path_for(42, "phar"),
            PathBuf::from("/srv/resources/0/42.phar")
        );
        assert_eq!(
            storage.path_for(1999, "html"),
            PathBuf::from("/srv/resources/1/1999.html")
        );
        assert_eq!(
            storage.path_for(2000, "txt"),
            PathBuf::from("/srv/resources/2/2000.txt")
        );
    }

    #[tokio::test]
    async fn test_prepare_path_creates_bucket() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(temp_dir.path());

        let path = storage.prepare_path(3001, "phar").await.unwrap();
        assert!(temp_dir.path().join("3").is_dir());
        assert_eq!(path, temp_dir.path().join("3").join("3001.phar"));
        assert!(!path.exists());
    }
}
