//! Analysis Session

use crate::aggregator::{CategoryAggregator, FeatureVector};
use crate::config::AnalysisConfig;
use crate::driver::{build_pool, WindowDriver};
use crate::error::FeatureError;
use crate::streaming::StreamingDriver;
use rank_index::RankIndex;
use rayon::ThreadPool;
use sample_window::{CategoryId, Sample};
use std::sync::Arc;
use tracing::info;

/// Validated rank index and category enumeration shared by every window
#[derive(Debug, Clone)]
pub struct Analyzer {
    index: RankIndex,
    config: AnalysisConfig,
    /// Worker pool reused across runs (`None` when sequential)
    thread_pool: Option<Arc<ThreadPool>>,
}

impl Analyzer {
    pub fn from_config(config: AnalysisConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        let index = RankIndex::with_policy(config.thresholds.clone(), config.overflow)?;
        let thread_pool = build_pool(config.workers)?;

        info!(
            "Analyzer ready: {} buckets, {} categories, window={}, workers={}",
            index.bucket_count(),
            config.categories.len(),
            config.window_width,
            config.workers
        );

        Ok(Self {
            index,
            config,
            thread_pool,
        })
    }

    pub fn aggregator(&self) -> CategoryAggregator<'_> {
        CategoryAggregator::new(
            &self.index,
            &self.config.categories,
            self.config.absent_categories,
        )
    }

    /// Batch driver on the analyzer's worker pool
    pub fn driver(&self) -> WindowDriver<'_> {
        match &self.thread_pool {
            Some(pool) => WindowDriver::with_thread_pool(self.aggregator(), Arc::clone(pool)),
            None => WindowDriver::sequential(self.aggregator()),
        }
    }

    /// Feature vectors for every window of the configured width
    pub fn run(&self, samples: &[Sample]) -> Result<Vec<FeatureVector>, FeatureError> {
        self.driver().run_sliding_windows(samples, self.config.window_width)
    }

    /// Incremental driver over the configured window width
    pub fn streaming(&self) -> Result<StreamingDriver<'_>, FeatureError> {
        StreamingDriver::new(self.aggregator(), self.config.window_width)
    }

    pub fn index(&self) -> &RankIndex {
        &self.index
    }

    pub fn categories(&self) -> &[CategoryId] {
        &self.config.categories
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}
