//! Value types and fixed catalog tables describing a plugin release.

mod api;
mod candidate;
mod catalog;
mod dependency;
mod flags;
mod license;
mod requirement;
mod stage;

pub use api::ApiVersionTable;
pub use candidate::{ReleaseCandidate, Spoon};
pub use catalog::{
    category_name, is_category, is_permission, permission_info, CATEGORIES, META_PERMISSION,
    PERMISSIONS,
};
pub use dependency::{DependencyTarget, PluginDependency, SELF_RELEASE_MARKER};
pub use flags::ReleaseFlags;
pub use license::License;
pub use requirement::{PluginRequirement, RequirementKind};
pub use stage::ReleaseStage;

/// Longest short description accepted, in bytes
pub const MAX_SHORT_DESC_LENGTH: usize = 128;
/// Longest version string accepted, in bytes
pub const MAX_VERSION_LENGTH: usize = 20;
/// Keywords beyond this count are dropped
pub const MAX_KEYWORD_COUNT: usize = 100;
