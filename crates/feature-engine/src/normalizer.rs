//! Column-Wise Feature Normalization

use crate::aggregator::FeatureVector;
use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest spread used as a divisor
const MIN_SPREAD: f64 = 0.0001;

/// Normalization method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Z-score per column
    #[default]
    ZScore,
    /// Min-max per column to [0, 1]
    MinMax,
    /// No normalization
    None,
}

/// Per-column normalizer for fixed-width feature vectors.
///
/// Fit on a batch of vectors produced with
/// [`AbsentCategoryPolicy::ZeroFill`](crate::AbsentCategoryPolicy), then apply
/// to the same or later vectors of the same width.
#[derive(Debug, Clone, Default)]
pub struct FeatureNormalizer {
    method: NormalizationMethod,
    means: Vec<f64>,
    std_devs: Vec<f64>,
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl FeatureNormalizer {
    pub fn new(method: NormalizationMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Learn column statistics; every vector must match the first one's width
    pub fn fit(&mut self, vectors: &[FeatureVector]) -> Result<(), FeatureError> {
        let Some(first) = vectors.first() else {
            self.means.clear();
            self.std_devs.clear();
            self.mins.clear();
            self.maxs.clear();
            return Ok(());
        };

        let width = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != width) {
            return Err(FeatureError::DimensionMismatch {
                expected: width,
                actual: bad.len(),
            });
        }

        let n = vectors.len() as f64;
        let mut means = vec![0.0; width];
        let mut mins = vec![f64::MAX; width];
        let mut maxs = vec![f64::MIN; width];
        for vector in vectors {
            for (col, &v) in vector.iter().enumerate() {
                means[col] += v;
                mins[col] = mins[col].min(v);
                maxs[col] = maxs[col].max(v);
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut variances = vec![0.0; width];
        for vector in vectors {
            for (col, &v) in vector.iter().enumerate() {
                let d = v - means[col];
                variances[col] += d * d;
            }
        }

        self.std_devs = variances.into_iter().map(|m2| (m2 / n).sqrt()).collect();
        self.means = means;
        self.mins = mins;
        self.maxs = maxs;

        debug!("Normalizer fitted on {} vectors of width {}", vectors.len(), width);
        Ok(())
    }

    /// Normalize one vector with the fitted statistics
    pub fn transform(&self, vector: &[f64]) -> Result<FeatureVector, FeatureError> {
        if vector.len() != self.width() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.width(),
                actual: vector.len(),
            });
        }

        let normalized = vector
            .iter()
            .enumerate()
            .map(|(col, &v)| match self.method {
                NormalizationMethod::ZScore => {
                    (v - self.means[col]) / self.std_devs[col].max(MIN_SPREAD)
                }
                NormalizationMethod::MinMax => {
                    let range = (self.maxs[col] - self.mins[col]).max(MIN_SPREAD);
                    (v - self.mins[col]) / range
                }
                NormalizationMethod::None => v,
            })
            .collect();
        Ok(normalized)
    }

    /// Fit on `vectors` and return them normalized
    pub fn fit_transform(
        &mut self,
        vectors: &[FeatureVector],
    ) -> Result<Vec<FeatureVector>, FeatureError> {
        self.fit(vectors)?;
        vectors.iter().map(|v| self.transform(v)).collect()
    }

    /// Width the normalizer was fitted on
    pub fn width(&self) -> usize {
        self.means.len()
    }

    pub fn method(&self) -> NormalizationMethod {
        self.method
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    pub fn mins(&self) -> &[f64] {
        &self.mins
    }

    pub fn maxs(&self) -> &[f64] {
        &self.maxs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Vec<FeatureVector> {
        vec![vec![0.0, 10.0, 1.0], vec![2.0, 10.0, 3.0], vec![4.0, 10.0, 5.0]]
    }

    #[test]
    fn test_zscore_normalization() {
        let mut norm = FeatureNormalizer::new(NormalizationMethod::ZScore);
        let out = norm.fit_transform(&batch()).unwrap();

        assert!((norm.means()[0] - 2.0).abs() < 1e-12);
        // Middle row sits on the mean
        assert!(out[1][0].abs() < 1e-12);
        assert!(out[2][0] > 0.0);
        // Constant column stays finite
        assert!(out.iter().all(|v| v[1].abs() < 1e-12));
    }

    #[test]
    fn test_minmax_normalization() {
        let mut norm = FeatureNormalizer::new(NormalizationMethod::MinMax);
        let out = norm.fit_transform(&batch()).unwrap();

        assert_eq!(out[0][2], 0.0);
        assert!((out[1][2] - 0.5).abs() < 1e-12);
        assert!((out[2][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_none_passes_through() {
        let mut norm = FeatureNormalizer::new(NormalizationMethod::None);
        assert_eq!(norm.fit_transform(&batch()).unwrap(), batch());
    }

    #[test]
    fn test_width_mismatch() {
        let mut norm = FeatureNormalizer::new(NormalizationMethod::ZScore);
        let err = norm.fit(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(err, FeatureError::DimensionMismatch { expected: 2, actual: 1 });

        norm.fit(&batch()).unwrap();
        assert_eq!(
            norm.transform(&[1.0]),
            Err(FeatureError::DimensionMismatch { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn test_empty_batch() {
        let mut norm = FeatureNormalizer::new(NormalizationMethod::ZScore);
        assert!(norm.fit_transform(&[]).unwrap().is_empty());
        assert_eq!(norm.width(), 0);
    }
}
