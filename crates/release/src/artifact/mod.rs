//! Artifact repackaging.
//!
//! A release never serves the build artifact directly. Instead the artifact
//! is copied into a new resource and the copy's `plugin.yml` gets the release
//! version written into it. The source resource is never modified.

mod manifest;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::resource::{ResourceError, ResourceStore};

pub use manifest::MANIFEST_ENTRY;

/// Resource type of plugin artifacts
pub const ARTIFACT_TYPE: &str = "phar";
pub const ARTIFACT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum RepackageError {
    #[error("build artifact {0} has already been deleted")]
    BuildArtifactGone(i64),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed archive: {0}")]
    Archive(#[from] ZipError),

    #[error("archive does not contain plugin.yml")]
    MissingManifest,

    #[error("unparsable plugin.yml: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("plugin.yml is not a key-value document")]
    ManifestNotAMapping,

    #[error("repackaging task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Copy the artifact in `source_id` into a new resource with its manifest
/// version set to `version`. Returns the new resource id.
pub async fn repackage(
    store: &ResourceStore,
    source_id: i64,
    version: &str,
) -> Result<i64, RepackageError> {
    let source = match store.resolve(source_id, Some(ARTIFACT_TYPE)).await {
        Ok(path) => path,
        Err(ResourceError::NotFound(_)) | Err(ResourceError::Expired { .. }) => {
            return Err(RepackageError::BuildArtifactGone(source_id));
        }
        Err(e) => return Err(e.into()),
    };

    let target = store.create(ARTIFACT_TYPE, ARTIFACT_MIME_TYPE, &[]).await?;
    tokio::fs::copy(&source, &target.path).await?;

    let path: PathBuf = target.path.clone();
    let version = version.to_string();
    tokio::task::spawn_blocking(move || rewrite_manifest_version(&path, &version)).await??;

    tracing::info!(
        source = source_id,
        artifact = target.id,
        "repackaged build artifact"
    );
    Ok(target.id)
}

/// Rewrite the manifest of the archive at `path`.
///
/// The new archive is staged next to the original and renamed over it, so a
/// failure leaves the file as it was.
fn rewrite_manifest_version(path: &Path, version: &str) -> Result<(), RepackageError> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;

    let manifest = {
        let mut entry = archive.by_name(MANIFEST_ENTRY).map_err(|e| match e {
            ZipError::FileNotFound => RepackageError::MissingManifest,
            e => e.into(),
        })?;
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        contents
    };
    let rewritten = manifest::set_version(&manifest, version)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = ZipWriter::new(staged.as_file_mut());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.name() == MANIFEST_ENTRY {
                let method = match entry.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                drop(entry);
                writer.start_file(MANIFEST_ENTRY, FileOptions::default().compression_method(method))?;
                writer.write_all(rewritten.as_bytes())?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }
        writer.finish()?;
    }
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
