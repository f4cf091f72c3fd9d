// Fixed-capacity recency window for one metric

use std::collections::VecDeque;

/// FIFO window of the most recent values for one metric, oldest first.
/// At capacity, pushing evicts the oldest value before appending.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The current window, oldest first. Returns an owned copy so callers
    /// can render it while the buffer keeps taking pushes.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Bucket each value into `[0, levels - 1]` by linear scaling between
    /// the window's own minimum and maximum. A flat window (max == min) is
    /// scaled as if max were min + 1, so every value lands in bucket 0.
    /// The scale is recomputed on every call; nothing is cached.
    pub fn render_heights(&self, levels: usize) -> Vec<usize> {
        if levels == 0 || self.values.is_empty() {
            return Vec::new();
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        self.values
            .iter()
            .map(|&v| {
                let h = ((v - min) / span * (levels - 1) as f64).round() as usize;
                h.min(levels - 1)
            })
            .collect()
    }
}
