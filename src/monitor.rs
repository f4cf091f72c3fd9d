// Sampling loop: owns per-metric aggregates, history windows and alert
// state; once per tick it pulls a sample and drives renderer + log sink.

use std::collections::HashMap;

use thiserror::Error;
use tokio::time::{Duration, interval};
use tracing::instrument;

use crate::alert::{AlertEvaluator, Thresholds};
use crate::history::HistoryBuffer;
use crate::models::{AlertEvent, AlertLevel, Metric, Sample};
use crate::stats::RunningStats;

/// Reads one sample per tick. Optional metrics come back `None` when the
/// platform cannot supply them; a required metric failing to read is an
/// error for the whole read.
pub trait MetricSource: Send {
    fn read(&mut self) -> Result<Sample, SourceError>;
}

/// Presents one frame per tick. Render failures are handled by the loop's
/// reset-once-then-disable policy, never propagated further.
pub trait Renderer: Send {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError>;
    /// One-shot reinitialization attempt after a render failure.
    fn reset(&mut self) -> Result<(), RenderError>;
    /// Final status once the loop has stopped. Best effort.
    fn finish(&mut self, summary: &SessionSummary);
}

/// Appends one sample per tick to durable storage.
pub trait LogSink: Send {
    fn append(&mut self, sample: &Sample) -> Result<(), SinkError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("required metric {metric} could not be read: {reason}")]
    Required {
        metric: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a renderer needs for one tick, in layout-independent form.
/// `stats` and `history` are indexed by `Metric::index()`.
pub struct RenderFrame<'a> {
    pub sample: &'a Sample,
    pub stats: &'a [RunningStats],
    pub history: &'a [HistoryBuffer],
    pub levels: &'a HashMap<Metric, AlertLevel>,
    pub events: &'a [AlertEvent],
    /// 1-based tick counter.
    pub tick: u64,
    /// True every `slow_refresh_divisor`-th tick (and on the first);
    /// expensive display sections refresh only on these.
    pub slow_tick: bool,
}

impl RenderFrame<'_> {
    pub fn stats_for(&self, metric: Metric) -> &RunningStats {
        &self.stats[metric.index()]
    }

    pub fn history_for(&self, metric: Metric) -> &HistoryBuffer {
        &self.history[metric.index()]
    }

    pub fn level_for(&self, metric: Metric) -> AlertLevel {
        self.levels
            .get(&metric)
            .copied()
            .unwrap_or(AlertLevel::Normal)
    }
}

/// Counters reported in the periodic stats log line and the final status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    /// Ticks dropped because a required metric could not be read.
    pub ticks_skipped: u64,
    pub samples_logged: u64,
    pub alerts_raised: u64,
}

/// Levels and emitted alert events for one observed sample.
pub struct TickOutcome {
    pub levels: HashMap<Metric, AlertLevel>,
    pub events: Vec<AlertEvent>,
}

/// Per-metric running stats, history windows and alert policy for one run.
/// Owned exclusively by the sampling loop; collaborators only see borrows.
pub struct Monitor {
    stats: Vec<RunningStats>,
    history: Vec<HistoryBuffer>,
    evaluator: AlertEvaluator,
    edge_triggered: bool,
    last_levels: HashMap<Metric, AlertLevel>,
}

impl Monitor {
    pub fn new(history_capacity: usize, thresholds: Thresholds, edge_triggered: bool) -> Self {
        Self {
            stats: vec![RunningStats::new(); Metric::COUNT],
            history: (0..Metric::COUNT)
                .map(|_| HistoryBuffer::new(history_capacity))
                .collect(),
            evaluator: AlertEvaluator::new(thresholds),
            edge_triggered,
            last_levels: HashMap::new(),
        }
    }

    /// Folds one sample into the aggregates and history, classifies it,
    /// and returns the levels plus the alert events to emit this tick.
    /// Metrics the sample marks unavailable are left untouched.
    pub fn observe(&mut self, sample: &Sample) -> TickOutcome {
        for metric in Metric::ALL {
            if let Some(value) = sample.value(metric) {
                self.stats[metric.index()].update(value);
                self.history[metric.index()].push(value);
            }
        }

        let levels = self.evaluator.evaluate(sample);
        let mut events = self.evaluator.events(sample);
        if self.edge_triggered {
            // Fire only on transition into a higher level.
            let last = &self.last_levels;
            events.retain(|ev| {
                ev.level > last.get(&ev.metric).copied().unwrap_or(AlertLevel::Normal)
            });
        }
        self.last_levels = levels.clone();

        TickOutcome { levels, events }
    }

    pub fn stats(&self) -> &[RunningStats] {
        &self.stats
    }

    pub fn history(&self) -> &[HistoryBuffer] {
        &self.history
    }

    pub fn stats_for(&self, metric: Metric) -> &RunningStats {
        &self.stats[metric.index()]
    }

    pub fn history_for(&self, metric: Metric) -> &HistoryBuffer {
        &self.history[metric.index()]
    }
}

/// Collaborators and shutdown channel for the loop.
pub struct MonitorDeps {
    pub source: Box<dyn MetricSource>,
    pub renderer: Box<dyn Renderer>,
    /// `None` runs without logging (disabled by config or startup failure).
    pub sink: Option<Box<dyn LogSink>>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Loop timing, window sizing and alert policy.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub refresh_interval_ms: u64,
    pub history_capacity: usize,
    /// Expensive display sections refresh every N-th tick.
    pub slow_refresh_divisor: u64,
    /// How often to log loop counters (real seconds).
    pub stats_log_interval_secs: u64,
    pub thresholds: Thresholds,
    pub edge_triggered_alerts: bool,
}

pub fn spawn(deps: MonitorDeps, config: MonitorConfig) -> tokio::task::JoinHandle<SessionSummary> {
    tokio::spawn(async move { run(deps, config).await })
}

/// Runs the sampling loop until shutdown is requested, then returns the
/// session counters.
#[instrument(skip(deps, config), fields(refresh_interval_ms = config.refresh_interval_ms))]
pub async fn run(mut deps: MonitorDeps, config: MonitorConfig) -> SessionSummary {
    // Platform counters report a meaningless first value (rates have no
    // baseline yet): read once and throw the sample away.
    if let Err(e) = deps.source.read() {
        tracing::warn!(error = %e, operation = "warmup_read", "warm-up read failed");
    }

    let mut monitor = Monitor::new(
        config.history_capacity,
        config.thresholds,
        config.edge_triggered_alerts,
    );
    let mut summary = SessionSummary::default();

    let mut tick = interval(Duration::from_millis(config.refresh_interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut tick_index: u64 = 0;
    let mut renderer_reset_attempted = false;
    let mut rendering_disabled = false;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let slow_tick = tick_index % config.slow_refresh_divisor.max(1) == 0;
                tick_index += 1;

                let sample = match deps.source.read() {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            operation = "read_sample",
                            "metric read failed; skipping tick"
                        );
                        summary.ticks_skipped += 1;
                        continue;
                    }
                };

                let outcome = monitor.observe(&sample);
                summary.ticks += 1;
                summary.alerts_raised += outcome.events.len() as u64;
                for ev in &outcome.events {
                    tracing::warn!(
                        metric = ev.metric.label(),
                        level = ev.level.label(),
                        value = ev.value,
                        threshold = ev.threshold,
                        "resource alert"
                    );
                }

                if !rendering_disabled {
                    let frame = RenderFrame {
                        sample: &sample,
                        stats: monitor.stats(),
                        history: monitor.history(),
                        levels: &outcome.levels,
                        events: &outcome.events,
                        tick: tick_index,
                        slow_tick,
                    };
                    if let Err(e) = deps.renderer.render(&frame) {
                        if renderer_reset_attempted {
                            rendering_disabled = true;
                            tracing::warn!(
                                error = %e,
                                operation = "render",
                                "render failed after reset; rendering disabled"
                            );
                        } else {
                            renderer_reset_attempted = true;
                            match deps.renderer.reset() {
                                Ok(()) => tracing::warn!(
                                    error = %e,
                                    operation = "render",
                                    "render failed; renderer reset"
                                ),
                                Err(reset_err) => {
                                    rendering_disabled = true;
                                    tracing::warn!(
                                        error = %reset_err,
                                        operation = "render_reset",
                                        "renderer reset failed; rendering disabled"
                                    );
                                }
                            }
                        }
                    }
                }

                if let Some(mut sink) = deps.sink.take() {
                    match sink.append(&sample) {
                        Ok(()) => {
                            summary.samples_logged += 1;
                            deps.sink = Some(sink);
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "append_sample",
                                "log sink failed; logging disabled for the rest of the run"
                            );
                        }
                    }
                }
            }
            _ = &mut deps.shutdown_rx => {
                tracing::debug!("Monitor shutting down");
                break;
            }
            _ = stats_log_tick.tick() => {
                tracing::info!(
                    ticks = summary.ticks,
                    ticks_skipped = summary.ticks_skipped,
                    samples_logged = summary.samples_logged,
                    alerts_raised = summary.alerts_raised,
                    "monitor stats"
                );
            }
        }
    }

    if !rendering_disabled {
        deps.renderer.finish(&summary);
    }
    tracing::info!(
        ticks = summary.ticks,
        ticks_skipped = summary.ticks_skipped,
        samples_logged = summary.samples_logged,
        alerts_raised = summary.alerts_raised,
        "monitor stopped"
    );
    summary
}
