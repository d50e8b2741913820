/// License declared by a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum License {
    None,
    /// Free-form license text, stored as an article resource
    Custom { resource_id: i64 },
    /// A tag from the source control license table, e.g. `mit`
    Named(String),
}

impl License {
    /// Value for `releases.license`
    pub fn tag(&self) -> &str {
        match self {
            License::None => "none",
            License::Custom { .. } => "custom",
            License::Named(tag) => tag,
        }
    }

    /// Value for `releases.license_res`
    pub fn resource_id(&self) -> Option<i64> {
        match self {
            License::Custom { resource_id } => Some(*resource_id),
            _ => None,
        }
    }
}
