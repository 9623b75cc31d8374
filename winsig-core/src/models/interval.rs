use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// A half open genomic interval `[begin, end)` on one sequence (chromosome).
///
/// Ordering is lexicographic over `(sequence_id, begin, end)`.
///
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenomicInterval {
    pub sequence_id: String,
    pub begin: i64,
    pub end: i64,
}

impl GenomicInterval {
    pub fn new<S: Into<String>>(sequence_id: S, begin: i64, end: i64) -> Self {
        GenomicInterval {
            sequence_id: sequence_id.into(),
            begin,
            end,
        }
    }

    ///
    /// Number of base pairs covered by the interval
    ///
    pub fn width(&self) -> i64 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    ///
    /// Get file string of the interval
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.sequence_id, self.begin, self.end)
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
