//! Bounded Sample Window

use crate::Sample;

/// Fixed-capacity FIFO holding the most recent samples of a stream.
///
/// Storage fills up to `capacity` and is then overwritten in place; `head`
/// points at the oldest retained sample once the window is full.
#[derive(Debug, Clone)]
pub struct SampleWindow<T = f64> {
    /// Retained samples, at most `capacity`
    storage: Vec<Sample<T>>,
    /// Capacity of the window
    capacity: usize,
    /// Position of the oldest sample (write position once full)
    head: usize,
    /// Total samples pushed (for statistics)
    total_written: usize,
}

impl<T: Copy> SampleWindow<T> {
    /// Create a window with given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Push a sample, returning the evicted oldest sample once full
    pub fn push(&mut self, sample: Sample<T>) -> Option<Sample<T>> {
        self.total_written += 1;

        if self.storage.len() < self.capacity {
            self.storage.push(sample);
            return None;
        }

        let evicted = std::mem::replace(&mut self.storage[self.head], sample);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample<T>> + '_ {
        let (newer, older) = self.storage.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Read the last N samples (most recent first)
    pub fn read_last(&self, count: usize) -> Vec<Sample<T>> {
        self.iter().rev().take(count).copied().collect()
    }

    /// Get the number of samples currently in the window
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Get total samples pushed (for statistics)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Drop every retained sample
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}
