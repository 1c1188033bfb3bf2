//! Analysis configuration

use crate::aggregator::AbsentCategoryPolicy;
use crate::error::FeatureError;
use rank_index::OverflowPolicy;
use sample_window::CategoryId;
use serde::{Deserialize, Serialize};

/// Calibration and windowing parameters for one analysis session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Non-decreasing rank thresholds, one per bucket
    pub thresholds: Vec<f64>,

    /// Known categories, in output order
    pub categories: Vec<CategoryId>,

    /// Samples per window
    pub window_width: usize,

    /// Worker threads for window evaluation (1 = sequential)
    pub workers: usize,

    /// Bucket for values above the top threshold
    pub overflow: OverflowPolicy,

    /// Representation of categories missing from a window
    pub absent_categories: AbsentCategoryPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            // -140 dBm to -45 dBm in 5 dB steps
            thresholds: (0..20i32).map(|i| -140.0 + 5.0 * f64::from(i)).collect(),
            categories: Vec::new(),
            window_width: 100,
            workers: 1,
            overflow: OverflowPolicy::FoldToFirst,
            absent_categories: AbsentCategoryPolicy::ZeroFill,
        }
    }
}

impl AnalysisConfig {
    /// Default config over the given categories
    pub fn for_categories(categories: impl Into<Vec<CategoryId>>) -> Self {
        Self {
            categories: categories.into(),
            ..Default::default()
        }
    }

    /// Reproduce historical outputs (overflow folded to bucket 0, absent categories omitted)
    pub fn compatible(categories: impl Into<Vec<CategoryId>>) -> Self {
        Self {
            overflow: OverflowPolicy::FoldToFirst,
            absent_categories: AbsentCategoryPolicy::Omit,
            ..Self::for_categories(categories)
        }
    }

    /// Fixed-width vectors with overflow clamped to the last bucket
    pub fn fixed_width(categories: impl Into<Vec<CategoryId>>) -> Self {
        Self {
            overflow: OverflowPolicy::ClampToLast,
            absent_categories: AbsentCategoryPolicy::ZeroFill,
            ..Self::for_categories(categories)
        }
    }

    /// Check the parameters the rank index does not validate itself
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.categories.is_empty() {
            return Err(FeatureError::EmptyCategories);
        }
        if self.window_width == 0 {
            return Err(FeatureError::InvalidWindow {
                width: 0,
                len: 0,
            });
        }
        Ok(())
    }
}
