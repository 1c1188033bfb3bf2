//! Rank Index Error Types

use thiserror::Error;

/// Errors raised while building a rank index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// Fewer than two thresholds were supplied
    #[error("too few rank thresholds: got {count}, need at least 2")]
    TooFewBuckets { count: usize },

    /// A threshold is smaller than (or not comparable with) its predecessor
    #[error("rank thresholds are not sorted: element {index} is less than its predecessor")]
    UnsortedThresholds { index: usize },
}
