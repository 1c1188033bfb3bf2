//! Rank Threshold Index and Bucket Frequencies
//!
//! Maps measurements onto a fixed, sorted table of calibration thresholds and
//! turns groups of measurements into normalized bucket histograms.

mod error;
mod frequency;
mod rank;

pub use error::RankError;
pub use frequency::{BucketCounts, FrequencyCalculator};
pub use rank::{OverflowPolicy, RankIndex, LOW_PRECISION_BUCKETS};
