use serde::{Deserialize, Serialize};

/// What a server owner has to supply for the plugin to work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementKind {
    Mail,
    ApiToken,
    Password,
    Other,
}

impl RequirementKind {
    /// Value for `release_reqr.type`
    pub fn code(&self) -> i64 {
        match self {
            RequirementKind::Mail => 1,
            RequirementKind::ApiToken => 2,
            RequirementKind::Password => 3,
            RequirementKind::Other => 4,
        }
    }
}

/// A typed requirement (or, when `is_require` is false, an optional enhancement)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRequirement {
    #[serde(rename = "type")]
    pub kind: RequirementKind,
    #[serde(default)]
    pub details: String,
    #[serde(default = "default_is_require")]
    pub is_require: bool,
}

fn default_is_require() -> bool {
    true
}
