//! Sliding Window Driver

use crate::aggregator::{CategoryAggregator, FeatureVector};
use crate::error::FeatureError;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use sample_window::Sample;
use std::sync::Arc;
use tracing::debug;

/// Build the worker pool for a worker hint; `None` means sequential
pub(crate) fn build_pool(workers: usize) -> Result<Option<Arc<ThreadPool>>, FeatureError> {
    if workers <= 1 {
        return Ok(None);
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| FeatureError::WorkerPool(e.to_string()))?;
    Ok(Some(Arc::new(pool)))
}

/// Runs the aggregator over every window position of a sample stream.
///
/// Without a pool windows are computed strictly in order on the calling
/// thread. With one, windows are dispatched onto its threads; results are
/// still returned in window order. The pool is built once and shared by
/// clones of the driver.
#[derive(Debug, Clone)]
pub struct WindowDriver<'a, T = f64> {
    aggregator: CategoryAggregator<'a, T>,
    thread_pool: Option<Arc<ThreadPool>>,
}

impl<'a, T> WindowDriver<'a, T>
where
    T: PartialOrd + Copy + Send + Sync,
{
    /// Driver with a dedicated pool of `workers` threads (`<= 1` = sequential)
    pub fn new(
        aggregator: CategoryAggregator<'a, T>,
        workers: usize,
    ) -> Result<Self, FeatureError> {
        Ok(Self {
            aggregator,
            thread_pool: build_pool(workers)?,
        })
    }

    /// Driver that never leaves the calling thread
    pub fn sequential(aggregator: CategoryAggregator<'a, T>) -> Self {
        Self {
            aggregator,
            thread_pool: None,
        }
    }

    /// Driver running on an existing pool
    pub fn with_thread_pool(
        aggregator: CategoryAggregator<'a, T>,
        pool: Arc<ThreadPool>,
    ) -> Self {
        Self {
            aggregator,
            thread_pool: Some(pool),
        }
    }

    /// Feature vectors for windows `[i, i + width)`, `i = 0..=len - width`
    pub fn run_sliding_windows(
        &self,
        stream: &[Sample<T>],
        window_width: usize,
    ) -> Result<Vec<FeatureVector>, FeatureError> {
        let len = stream.len();
        if window_width == 0 || window_width > len {
            return Err(FeatureError::InvalidWindow {
                width: window_width,
                len,
            });
        }

        debug!(
            "Running {} windows of width {} over {} samples ({} workers)",
            len - window_width + 1,
            window_width,
            len,
            self.workers()
        );

        let aggregator = &self.aggregator;
        let vectors = match &self.thread_pool {
            None => stream
                .windows(window_width)
                .map(|window| aggregator.aggregate_window(window))
                .collect::<Vec<_>>(),
            Some(pool) => pool.install(|| {
                stream
                    .par_windows(window_width)
                    .map(|window| aggregator.aggregate_window(window))
                    .collect::<Vec<_>>()
            }),
        };

        debug!("Computed {} windows", vectors.len());
        Ok(vectors)
    }

    /// Threads windows are spread over (1 when sequential)
    pub fn workers(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map_or(1, |pool| pool.current_num_threads())
    }

    pub fn aggregator(&self) -> &CategoryAggregator<'a, T> {
        &self.aggregator
    }

    pub(crate) fn thread_pool(&self) -> Option<&Arc<ThreadPool>> {
        self.thread_pool.as_ref()
    }
}
