/// Dependency name that marks the version field as a release id
pub const SELF_RELEASE_MARKER: &str = "poggit-release";

/// What a submitted dependency entry points at, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    /// A plugin outside the catalog, taken literally
    External { name: String, version: String },
    /// Another release in the catalog, by id
    Internal { release_id: i64 },
}

/// A resolved dependency, as stored in `release_deps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDependency {
    pub name: String,
    pub version: String,
    pub dependency_release_id: Option<i64>,
    pub is_hard: bool,
}
