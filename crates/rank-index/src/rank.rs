//! Rank Threshold Index

use crate::error::RankError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Threshold tables shorter than this are accepted but reported as coarse
pub const LOW_PRECISION_BUCKETS: usize = 20;

/// Where values above the top threshold are counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Fold into bucket 0 (matches historical feature outputs)
    #[default]
    FoldToFirst,
    /// Clamp into the last bucket
    ClampToLast,
}

/// Immutable lookup from a measurement to its rank bucket.
///
/// Bucket `i` holds the values `v` for which `thresholds[i]` is the first
/// threshold with `thresholds[i] >= v` (lower-bound semantics). Repeated
/// thresholds resolve to the ordinal of their first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct RankIndex<T = f64> {
    /// Non-decreasing bucket boundaries
    thresholds: Box<[T]>,
    /// Handling of values above every threshold
    policy: OverflowPolicy,
}

impl<T: PartialOrd + Copy> RankIndex<T> {
    /// Build an index with the default overflow policy
    pub fn new(thresholds: impl Into<Vec<T>>) -> Result<Self, RankError> {
        Self::with_policy(thresholds, OverflowPolicy::default())
    }

    /// Build an index with an explicit overflow policy
    pub fn with_policy(
        thresholds: impl Into<Vec<T>>,
        policy: OverflowPolicy,
    ) -> Result<Self, RankError> {
        let thresholds = thresholds.into();
        let count = thresholds.len();

        if count < 2 {
            return Err(RankError::TooFewBuckets { count });
        }
        if count < LOW_PRECISION_BUCKETS {
            warn!(
                "Too few rank thresholds ({}), bucket precision may be reduced",
                count
            );
        }

        // NaN compares with nothing, so it is rejected along with real decreases
        if let Some(pos) = thresholds.windows(2).position(|pair| {
            !matches!(
                pair[0].partial_cmp(&pair[1]),
                Some(Ordering::Less | Ordering::Equal)
            )
        }) {
            return Err(RankError::UnsortedThresholds { index: pos + 1 });
        }

        debug!("Rank index built: {} buckets, {:?}", count, policy);

        Ok(Self {
            thresholds: thresholds.into_boxed_slice(),
            policy,
        })
    }

    /// Map a measurement to its bucket ordinal
    pub fn bucket_of(&self, value: T) -> usize {
        let idx = self.thresholds.partition_point(|t| *t < value);
        if idx < self.thresholds.len() {
            return idx;
        }
        match self.policy {
            OverflowPolicy::FoldToFirst => 0,
            OverflowPolicy::ClampToLast => self.thresholds.len() - 1,
        }
    }
}

impl<T> RankIndex<T> {
    /// Number of buckets (equal to the number of thresholds)
    pub fn bucket_count(&self) -> usize {
        self.thresholds.len()
    }

    pub fn thresholds(&self) -> &[T] {
        &self.thresholds
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Whether construction reported the reduced-precision advisory
    pub fn is_low_precision(&self) -> bool {
        self.thresholds.len() < LOW_PRECISION_BUCKETS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_too_few_buckets() {
        assert_eq!(
            RankIndex::<f64>::new(vec![]),
            Err(RankError::TooFewBuckets { count: 0 })
        );
        assert_eq!(
            RankIndex::new(vec![1.0]),
            Err(RankError::TooFewBuckets { count: 1 })
        );
    }

    #[test]
    fn test_unsorted_thresholds() {
        let err = RankIndex::new(vec![0.0, 10.0, 5.0, 20.0]).unwrap_err();
        assert_eq!(err, RankError::UnsortedThresholds { index: 2 });

        let err = RankIndex::new(vec![0.0, f64::NAN, 20.0]).unwrap_err();
        assert_eq!(err, RankError::UnsortedThresholds { index: 1 });
    }

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.contents())
    }

    #[test]
    fn test_short_table_warns_but_builds() {
        let (index, logs) = with_captured_logs(|| RankIndex::new(vec![0.0, 1.0]).unwrap());
        assert_eq!(index.bucket_count(), 2);
        assert!(index.is_low_precision());
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("Too few rank thresholds (2)"), "logs: {}", logs);

        let wide: Vec<f64> = (0..20i32).map(f64::from).collect();
        let (index, logs) = with_captured_logs(|| RankIndex::new(wide).unwrap());
        assert!(!index.is_low_precision());
        assert!(!logs.contains("Too few rank thresholds"), "logs: {}", logs);
    }

    #[test]
    fn test_lower_bound_lookup() {
        let index = RankIndex::new(vec![0.0, 10.0, 20.0]).unwrap();
        assert_eq!(index.bucket_of(-5.0), 0);
        assert_eq!(index.bucket_of(0.0), 0);
        assert_eq!(index.bucket_of(0.5), 1);
        assert_eq!(index.bucket_of(10.0), 1);
        assert_eq!(index.bucket_of(15.0), 2);
        assert_eq!(index.bucket_of(20.0), 2);
    }

    #[test]
    fn test_overflow_folds_to_first_bucket() {
        let index = RankIndex::new(vec![0.0, 10.0, 20.0]).unwrap();
        assert_eq!(index.policy(), OverflowPolicy::FoldToFirst);
        assert_eq!(index.bucket_of(25.0), 0);
        assert_eq!(index.bucket_of(f64::INFINITY), 0);
    }

    #[test]
    fn test_overflow_clamps_to_last_bucket() {
        let index =
            RankIndex::with_policy(vec![0.0, 10.0, 20.0], OverflowPolicy::ClampToLast).unwrap();
        assert_eq!(index.bucket_of(25.0), 2);
        assert_eq!(index.bucket_of(20.0), 2);
        assert_eq!(index.bucket_of(-1.0), 0);
    }

    #[test]
    fn test_duplicate_thresholds_use_first_ordinal() {
        let index = RankIndex::new(vec![0, 5, 5, 5, 9]).unwrap();
        assert_eq!(index.bucket_count(), 5);
        assert_eq!(index.bucket_of(5), 1);
        assert_eq!(index.bucket_of(4), 1);
        assert_eq!(index.bucket_of(6), 4);
    }

    #[test]
    fn test_nan_measurement_lands_in_first_bucket() {
        let index =
            RankIndex::with_policy(vec![0.0, 10.0], OverflowPolicy::ClampToLast).unwrap();
        assert_eq!(index.bucket_of(f64::NAN), 0);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&OverflowPolicy::ClampToLast).unwrap();
        assert_eq!(json, "\"clamp_to_last\"");
        let back: OverflowPolicy = serde_json::from_str("\"fold_to_first\"").unwrap();
        assert_eq!(back, OverflowPolicy::FoldToFirst);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_threshold_maps_to_first_ordinal(
                mut thresholds in prop::collection::vec(-1000i64..1000, 2..40),
                pick in any::<prop::sample::Index>(),
            ) {
                thresholds.sort_unstable();
                let index = RankIndex::new(thresholds.clone()).unwrap();
                let value = thresholds[pick.index(thresholds.len())];
                let first = thresholds.iter().position(|&t| t == value).unwrap();
                prop_assert_eq!(index.bucket_of(value), first);
            }

            #[test]
            fn prop_decrease_is_rejected(
                mut thresholds in prop::collection::vec(-1000i64..1000, 2..40),
                at in any::<prop::sample::Index>(),
            ) {
                thresholds.sort_unstable();
                let i = at.index(thresholds.len() - 1) + 1;
                thresholds[i] = thresholds[i - 1] - 1;
                prop_assert!(matches!(
                    RankIndex::new(thresholds),
                    Err(RankError::UnsortedThresholds { .. })
                ), "expected UnsortedThresholds error");
            }
        }
    }
}
