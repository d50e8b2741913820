//! The `plugin.yml` manifest carried inside every plugin artifact.

use serde_yaml::Value;

use super::RepackageError;

/// Archive entry holding the plugin manifest
pub const MANIFEST_ENTRY: &str = "plugin.yml";

/// Replace the `version` field of a manifest, leaving every other key as-is.
pub(crate) fn set_version(manifest: &str, version: &str) -> Result<String, RepackageError> {
    let mut doc: Value = serde_yaml::from_str(manifest)?;
    let fields = doc
        .as_mapping_mut()
        .ok_or(RepackageError::ManifestNotAMapping)?;
    fields.insert(
        Value::String("version".to_string()),
        Value::String(version.to_string()),
    );
    Ok(serde_yaml::to_string(&doc)?)
}
