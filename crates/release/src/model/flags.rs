use serde::{Deserialize, Serialize};

const FLAG_PRE_RELEASE: i64 = 0x02;
const FLAG_OUTDATED: i64 = 0x04;
const FLAG_OFFICIAL: i64 = 0x08;

/// Release flags. Stored as a bitmask in `releases.flags`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFlags {
    pub pre_release: bool,
    pub outdated: bool,
    pub official: bool,
}

impl ReleaseFlags {
    pub fn bits(&self) -> i64 {
        let mut bits = 0;
        if self.pre_release {
            bits |= FLAG_PRE_RELEASE;
        }
        if self.outdated {
            bits |= FLAG_OUTDATED;
        }
        if self.official {
            bits |= FLAG_OFFICIAL;
        }
        bits
    }

    pub fn from_bits(bits: i64) -> Self {
        Self {
            pre_release: bits & FLAG_PRE_RELEASE != 0,
            outdated: bits & FLAG_OUTDATED != 0,
            official: bits & FLAG_OFFICIAL != 0,
        }
    }
}
