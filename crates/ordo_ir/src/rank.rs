//! Execution position keys.

use std::fmt;

use smallvec::SmallVec;

/// Root-to-node sequence of per-level positions.
///
/// Ordered lexicographically; a rank sorts before all of its own extensions,
/// so `(2)` < `(2, 0)` < `(3)`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rank(SmallVec<[u64; 4]>);

impl Rank {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Rank(values.into_iter().collect())
    }

    pub fn values(&self) -> &[u64] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<&[u64]> for Rank {
    fn from(values: &[u64]) -> Self {
        Rank(SmallVec::from_slice(values))
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank{self}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}
