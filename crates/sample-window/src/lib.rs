//! Category-Tagged Samples
//!
//! Sample type shared by the feature pipeline plus a bounded window that
//! keeps the most recent samples of a stream.

mod window;

pub use window::SampleWindow;

use serde::{Deserialize, Serialize};

/// Identifier of the category (cell / PCI) a measurement belongs to
pub type CategoryId = i32;

/// One measurement tagged with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample<T = f64> {
    pub category: CategoryId,
    pub value: T,
}

impl<T> Sample<T> {
    pub fn new(category: CategoryId, value: T) -> Self {
        Self { category, value }
    }
}

impl<T> From<(CategoryId, T)> for Sample<T> {
    fn from((category, value): (CategoryId, T)) -> Self {
        Self { category, value }
    }
}
