//! Normalized Bucket Frequencies

use crate::rank::RankIndex;
use std::borrow::Borrow;

/// Integer per-bucket tallies for one group of measurements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketCounts {
    counts: Vec<usize>,
    total: usize,
}

impl BucketCounts {
    /// Create empty tallies for `bucket_count` buckets
    pub fn new(bucket_count: usize) -> Self {
        Self {
            counts: vec![0; bucket_count],
            total: 0,
        }
    }

    /// Record one observation in `bucket`; returns false if the bucket does not exist
    pub fn add(&mut self, bucket: usize) -> bool {
        match self.counts.get_mut(bucket) {
            Some(count) => {
                *count += 1;
                self.total += 1;
                true
            }
            None => false,
        }
    }

    /// Remove one observation from `bucket`; returns false if it was already empty
    pub fn remove(&mut self, bucket: usize) -> bool {
        match self.counts.get_mut(bucket) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.total -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of observations across all buckets
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Fraction of observations per bucket (all zeros when empty)
    pub fn frequencies(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let n = self.total as f64;
        self.counts.iter().map(|&c| c as f64 / n).collect()
    }
}

/// Histogram computation over a rank index
pub struct FrequencyCalculator;

impl FrequencyCalculator {
    /// Tally measurements into their rank buckets
    pub fn count<T, I>(values: I, index: &RankIndex<T>) -> BucketCounts
    where
        T: PartialOrd + Copy,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut counts = BucketCounts::new(index.bucket_count());
        for value in values {
            counts.add(index.bucket_of(*value.borrow()));
        }
        counts
    }

    /// Normalized histogram of `values`, one fraction per bucket.
    ///
    /// An empty input yields an all-zero histogram rather than an error.
    pub fn compute_histogram<T, I>(values: I, index: &RankIndex<T>) -> Vec<f64>
    where
        T: PartialOrd + Copy,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        Self::count(values, index).frequencies()
    }
}
