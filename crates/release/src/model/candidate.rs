use super::{License, PluginDependency, PluginRequirement, ReleaseFlags, ReleaseStage};

/// An inclusive range of compatible API versions, as indices into the
/// [`ApiVersionTable`](super::ApiVersionTable). `since <= till` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spoon {
    pub since: usize,
    pub till: usize,
}

impl Spoon {
    /// Build a spoon from two indices in either order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            since: a.min(b),
            till: a.max(b),
        }
    }
}

/// A fully validated release, ready to be persisted.
///
/// Only the validator builds these, and it only hands one out after the
/// artifact has been repackaged.
#[derive(Debug, Clone)]
pub struct ReleaseCandidate {
    pub name: String,
    pub short_desc: String,
    pub version: String,

    pub project_id: i64,
    pub build_id: i64,
    pub artifact_resource_id: i64,

    pub description_resource_id: i64,
    /// [`NULL_RESOURCE`](crate::resource::NULL_RESOURCE) on a project's first release
    pub change_log_resource_id: i64,
    pub license: License,
    pub icon_url: Option<String>,

    /// First entry is the major category
    pub categories: Vec<u32>,
    pub keywords: Vec<String>,
    pub spoons: Vec<Spoon>,
    pub dependencies: Vec<PluginDependency>,
    pub permissions: Vec<u32>,
    pub requirements: Vec<PluginRequirement>,

    pub flags: ReleaseFlags,
    pub stage: ReleaseStage,
    /// Unix timestamp
    pub creation: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoon_orders_indices() {
        assert_eq!(Spoon::new(5, 0), Spoon { since: 0, till: 5 });
        assert_eq!(Spoon::new(2, 7), Spoon { since: 2, till: 7 });
        assert_eq!(Spoon::new(3, 3), Spoon { since: 3, till: 3 });
    }
}
