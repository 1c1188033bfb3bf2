//! Rank Histogram Feature Engine
//!
//! Turns a stream of category-tagged measurements into one feature vector per
//! sliding window: for each known category, the category's share of the
//! window followed by its normalized rank-bucket histogram.

mod aggregator;
mod analyzer;
mod config;
mod driver;
mod error;
mod normalizer;
mod streaming;

pub use aggregator::{AbsentCategoryPolicy, CategoryAggregator, FeatureVector};
pub use analyzer::Analyzer;
pub use config::AnalysisConfig;
pub use driver::WindowDriver;
pub use error::FeatureError;
pub use normalizer::{FeatureNormalizer, NormalizationMethod};
pub use streaming::StreamingDriver;

pub use rank_index::{OverflowPolicy, RankError, RankIndex};
pub use sample_window::{CategoryId, Sample};
