use std::cmp::Ordering;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// Region struct, one `chr start end` line of a BED file
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chr: impl Into<String>, start: u64, end: u64) -> Self {
        Region {
            chr: chr.into(),
            start,
            end,
        }
    }

    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.chr, self.start, self.end)
    }

    /// Two regions touch when they are on the same chromosome and either
    /// overlap or abut (`a.end == b.start`).
    pub fn touches(&self, other: &Region) -> bool {
        self.chr == other.chr && self.start <= other.end && other.start <= self.end
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chr
            .cmp(&other.chr)
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
