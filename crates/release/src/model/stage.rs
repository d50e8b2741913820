use serde::{Deserialize, Serialize};

/// Moderation lifecycle position of a release.
///
/// Direct submissions only ever produce [`ReleaseStage::Draft`] or
/// [`ReleaseStage::Unchecked`]; everything above is reached through review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i64)]
pub enum ReleaseStage {
    Draft = 0,
    Unchecked = 1,
    Restricted = 2,
    Trusted = 3,
    Approved = 4,
    Featured = 5,
}

impl ReleaseStage {
    /// Name shown to users
    pub fn human(&self) -> &'static str {
        match self {
            ReleaseStage::Draft => "Draft",
            ReleaseStage::Unchecked => "Submitted",
            ReleaseStage::Restricted => "Checked",
            ReleaseStage::Trusted => "Voted",
            ReleaseStage::Approved => "Approved",
            ReleaseStage::Featured => "Featured",
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(ReleaseStage::Draft),
            1 => Some(ReleaseStage::Unchecked),
            2 => Some(ReleaseStage::Restricted),
            3 => Some(ReleaseStage::Trusted),
            4 => Some(ReleaseStage::Approved),
            5 => Some(ReleaseStage::Featured),
            _ => None,
        }
    }

    /// Stage assigned to a fresh submission
    pub fn for_submission(as_draft: bool) -> Self {
        if as_draft {
            ReleaseStage::Draft
        } else {
            ReleaseStage::Unchecked
        }
    }
}

impl std::fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.human())
    }
}
