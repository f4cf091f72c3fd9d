// Threshold classification for percentage metrics

use std::collections::HashMap;

use crate::models::{AlertEvent, AlertLevel, Metric, Sample};

/// Caution / warning / critical boundaries, strictly ascending percentages.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub caution: f64,
    pub warning: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            caution: 60.0,
            warning: 80.0,
            critical: 90.0,
        }
    }
}

/// Stateless classifier: the same value and thresholds always produce the
/// same level. Comparison is strict, so a value sitting exactly on a
/// boundary stays in the lower level.
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluator {
    thresholds: Thresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn classify(&self, value: f64) -> AlertLevel {
        if value > self.thresholds.critical {
            AlertLevel::Critical
        } else if value > self.thresholds.warning {
            AlertLevel::Warning
        } else if value > self.thresholds.caution {
            AlertLevel::Caution
        } else {
            AlertLevel::Normal
        }
    }

    /// The boundary a value must exceed to reach `level`.
    pub fn boundary(&self, level: AlertLevel) -> f64 {
        match level {
            AlertLevel::Normal => 0.0,
            AlertLevel::Caution => self.thresholds.caution,
            AlertLevel::Warning => self.thresholds.warning,
            AlertLevel::Critical => self.thresholds.critical,
        }
    }

    /// Classifies every percentage metric in the sample.
    pub fn evaluate(&self, sample: &Sample) -> HashMap<Metric, AlertLevel> {
        Metric::PERCENT
            .iter()
            .filter_map(|&metric| {
                sample
                    .value(metric)
                    .map(|value| (metric, self.classify(value)))
            })
            .collect()
    }

    /// One alert event per metric currently above the caution boundary.
    /// Emission cadence (every tick vs. on transition) is the caller's
    /// concern; this is recomputed fresh from the sample each call.
    pub fn events(&self, sample: &Sample) -> Vec<AlertEvent> {
        Metric::PERCENT
            .iter()
            .filter_map(|&metric| {
                let value = sample.value(metric)?;
                let level = self.classify(value);
                if level > AlertLevel::Normal {
                    Some(AlertEvent {
                        metric,
                        level,
                        value,
                        threshold: self.boundary(level),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}
