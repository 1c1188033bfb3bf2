//! Per-Window Category Aggregation

use rank_index::{BucketCounts, FrequencyCalculator, RankIndex};
use sample_window::{CategoryId, Sample};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Flattened `[count / S, histogram...]` blocks of one window
pub type FeatureVector = Vec<f64>;

/// How a known category without samples in the window is represented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentCategoryPolicy {
    /// Emit nothing; vector width varies with the categories present
    Omit,
    /// Emit a zero block so every vector has the same width
    #[default]
    ZeroFill,
}

/// Builds one feature vector per window from category-tagged samples
#[derive(Debug, Clone, Copy)]
pub struct CategoryAggregator<'a, T = f64> {
    index: &'a RankIndex<T>,
    categories: &'a [CategoryId],
    policy: AbsentCategoryPolicy,
}

impl<'a, T: PartialOrd + Copy> CategoryAggregator<'a, T> {
    pub fn new(
        index: &'a RankIndex<T>,
        categories: &'a [CategoryId],
        policy: AbsentCategoryPolicy,
    ) -> Self {
        Self {
            index,
            categories,
            policy,
        }
    }

    /// Aggregate one window of samples.
    ///
    /// Samples whose category is not in the enumeration are ignored, both for
    /// the histograms and for the count denominator.
    pub fn aggregate_window(&self, samples: &[Sample<T>]) -> FeatureVector {
        let mut partitions: HashMap<CategoryId, Vec<T>> = HashMap::new();
        for sample in samples {
            partitions
                .entry(sample.category)
                .or_default()
                .push(sample.value);
        }

        let counts: HashMap<CategoryId, BucketCounts> = partitions
            .into_iter()
            .map(|(category, values)| (category, FrequencyCalculator::count(&values, self.index)))
            .collect();

        self.assemble(|category| counts.get(&category))
    }

    /// Flatten per-category tallies in enumeration order
    pub(crate) fn assemble<'c, F>(&self, lookup: F) -> FeatureVector
    where
        F: Fn(CategoryId) -> Option<&'c BucketCounts>,
    {
        let present = |category: CategoryId| lookup(category).filter(|c| !c.is_empty());

        let total: usize = self
            .categories
            .iter()
            .filter_map(|&category| present(category))
            .map(BucketCounts::total)
            .sum();

        let mut values = Vec::with_capacity(self.full_width());
        let mut emitted = 0;
        for &category in self.categories {
            match present(category) {
                Some(counts) => {
                    values.push(counts.total() as f64 / total as f64);
                    values.extend(counts.frequencies());
                    emitted += 1;
                }
                None if self.policy == AbsentCategoryPolicy::ZeroFill => {
                    values.extend(std::iter::repeat(0.0).take(self.block_width()));
                }
                None => {}
            }
        }

        trace!(
            "Window aggregated: {} of {} categories present, S={}",
            emitted,
            self.categories.len(),
            total
        );
        values
    }
}

impl<'a, T> CategoryAggregator<'a, T> {
    /// Width of one category block (`bucket_count + 1`)
    pub fn block_width(&self) -> usize {
        self.index.bucket_count() + 1
    }

    /// Width of a vector with every category present
    pub fn full_width(&self) -> usize {
        self.block_width() * self.categories.len()
    }

    pub fn index(&self) -> &'a RankIndex<T> {
        self.index
    }

    pub fn categories(&self) -> &'a [CategoryId] {
        self.categories
    }

    pub fn policy(&self) -> AbsentCategoryPolicy {
        self.policy
    }
}
