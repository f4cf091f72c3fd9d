// Online per-metric aggregates (count / max / mean)

/// Running aggregate of every value one metric has produced this run.
///
/// `max` is seeded to the first observed value and never decreases; `mean`
/// uses the incremental form `mean += (value - mean) / count`, which stays
/// numerically stable over arbitrarily long runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: u64,
    max: f64,
    mean: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation in and returns the updated `(max, mean)`.
    pub fn update(&mut self, value: f64) -> (f64, f64) {
        self.count += 1;
        if self.count == 1 {
            self.max = value;
            self.mean = value;
        } else {
            if value > self.max {
                self.max = value;
            }
            self.mean += (value - self.mean) / self.count as f64;
        }
        (self.max, self.mean)
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Maximum observed so far; 0.0 before the first update.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean of all observations so far; 0.0 before the first update.
    pub fn mean(&self) -> f64 {
        self.mean
    }
}
