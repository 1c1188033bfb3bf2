//! Incremental Sliding Window

use crate::aggregator::{CategoryAggregator, FeatureVector};
use crate::error::FeatureError;
use rank_index::BucketCounts;
use sample_window::{CategoryId, Sample, SampleWindow};
use std::collections::HashMap;
use tracing::debug;

/// Push-based counterpart of [`WindowDriver`](crate::WindowDriver).
///
/// Keeps the last `width` samples and per-category bucket tallies that are
/// updated as samples enter and leave, so each step costs O(categories ×
/// buckets) instead of re-bucketing the whole window. The emitted vectors are
/// identical to the batch driver's for the same stream.
#[derive(Debug, Clone)]
pub struct StreamingDriver<'a, T = f64> {
    aggregator: CategoryAggregator<'a, T>,
    window: SampleWindow<T>,
    /// Tallies for known categories only
    counts: HashMap<CategoryId, BucketCounts>,
}

impl<'a, T: PartialOrd + Copy> StreamingDriver<'a, T> {
    pub fn new(aggregator: CategoryAggregator<'a, T>, width: usize) -> Result<Self, FeatureError> {
        if width == 0 {
            return Err(FeatureError::InvalidWindow { width, len: 0 });
        }

        let bucket_count = aggregator.index().bucket_count();
        let counts = aggregator
            .categories()
            .iter()
            .map(|&category| (category, BucketCounts::new(bucket_count)))
            .collect();

        debug!("Streaming driver created: width={}", width);

        Ok(Self {
            aggregator,
            window: SampleWindow::new(width),
            counts,
        })
    }

    /// Add one sample; returns the window's vector once `width` samples are held
    pub fn push(&mut self, sample: impl Into<Sample<T>>) -> Option<FeatureVector> {
        let sample = sample.into();
        let index = self.aggregator.index();

        if let Some(evicted) = self.window.push(sample) {
            if let Some(counts) = self.counts.get_mut(&evicted.category) {
                counts.remove(index.bucket_of(evicted.value));
            }
        }
        if let Some(counts) = self.counts.get_mut(&sample.category) {
            counts.add(index.bucket_of(sample.value));
        }

        if !self.window.is_full() {
            return None;
        }
        Some(self.aggregator.assemble(|category| self.counts.get(&category)))
    }

    /// Push every sample, collecting the vectors emitted along the way
    pub fn push_all<I>(&mut self, samples: I) -> Vec<FeatureVector>
    where
        I: IntoIterator,
        I::Item: Into<Sample<T>>,
    {
        samples.into_iter().filter_map(|s| self.push(s)).collect()
    }

    /// Forget all buffered samples
    pub fn reset(&mut self) {
        self.window.clear();
        for counts in self.counts.values_mut() {
            *counts = BucketCounts::new(counts.counts().len());
        }
    }

    pub fn width(&self) -> usize {
        self.window.capacity()
    }

    /// Samples currently buffered
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AbsentCategoryPolicy;
    use crate::driver::WindowDriver;
    use proptest::prelude::*;
    use rank_index::RankIndex;

    #[test]
    fn test_emits_after_fill() {
        let index = RankIndex::new(vec![0.0, 10.0, 20.0]).unwrap();
        let categories = [1, 2];
        let aggregator = CategoryAggregator::new(&index, &categories, AbsentCategoryPolicy::Omit);
        let mut driver = StreamingDriver::new(aggregator, 3).unwrap();

        assert!(driver.push((1, 5.0)).is_none());
        assert!(driver.push((1, 15.0)).is_none());
        let first = driver.push((2, 25.0)).unwrap();
        assert_eq!(first, vec![2.0 / 3.0, 0.0, 0.5, 0.5, 1.0 / 3.0, 1.0, 0.0, 0.0]);

        // (1, 5.0) leaves the window
        let second = driver.push((2, 8.0)).unwrap();
        assert_eq!(second, vec![1.0 / 3.0, 0.0, 0.0, 1.0, 2.0 / 3.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_zero_width_rejected() {
        let index = RankIndex::new(vec![0.0, 10.0]).unwrap();
        let categories = [1];
        let aggregator = CategoryAggregator::new(&index, &categories, AbsentCategoryPolicy::Omit);
        assert_eq!(
            StreamingDriver::new(aggregator, 0).unwrap_err(),
            FeatureError::InvalidWindow { width: 0, len: 0 }
        );
    }

    #[test]
    fn test_reset_starts_over() {
        let index = RankIndex::new(vec![0.0, 10.0]).unwrap();
        let categories = [1];
        let aggregator =
            CategoryAggregator::new(&index, &categories, AbsentCategoryPolicy::ZeroFill);
        let mut driver = StreamingDriver::new(aggregator, 2).unwrap();

        driver.push((1, 1.0));
        driver.push((1, 2.0));
        driver.reset();
        assert!(driver.is_empty());
        assert!(driver.push((1, -1.0)).is_none());
        assert_eq!(driver.push((1, -2.0)), Some(vec![1.0, 1.0, 0.0]));
    }

    proptest! {
        #[test]
        fn prop_matches_batch_driver(
            pairs in prop::collection::vec((0i32..5, -5.0f64..35.0), 1..150),
            width_seed in any::<prop::sample::Index>(),
            zero_fill in any::<bool>(),
        ) {
            let index = RankIndex::new(vec![0.0, 10.0, 20.0, 30.0]).unwrap();
            // category 4 never appears in the enumeration
            let categories = [3, 0, 1, 2];
            let policy = if zero_fill { AbsentCategoryPolicy::ZeroFill } else { AbsentCategoryPolicy::Omit };
            let aggregator = CategoryAggregator::new(&index, &categories, policy);

            let samples: Vec<Sample> = pairs.into_iter().map(Sample::from).collect();
            let width = width_seed.index(samples.len()) + 1;

            let batch = WindowDriver::sequential(aggregator)
                .run_sliding_windows(&samples, width)
                .unwrap();
            let streamed = StreamingDriver::new(aggregator, width)
                .unwrap()
                .push_all(samples.iter().copied());

            prop_assert_eq!(streamed, batch);
        }
    }
}
