//! Feature Engine Error Types

use rank_index::RankError;
use thiserror::Error;

/// Errors raised by window drivers, normalization and configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Window width outside `1..=len`; `len` is 0 when no stream is known yet
    #[error("invalid window width {width} for a stream of {len} samples")]
    InvalidWindow { width: usize, len: usize },

    /// Rank threshold table rejected
    #[error("rank index: {0}")]
    Rank(#[from] RankError),

    /// No categories to aggregate over
    #[error("category enumeration is empty")]
    EmptyCategories,

    /// Feature vectors of inconsistent width
    #[error("feature vector width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Worker pool could not be created
    #[error("failed to create worker pool: {0}")]
    WorkerPool(String),
}
