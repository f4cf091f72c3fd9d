// Console renderer: full-screen text dashboard redrawn in place.

use std::io::{Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute, queue,
    style::{self, Color},
    terminal::{self, ClearType},
};

use crate::models::{AlertLevel, Metric};
use crate::monitor::{RenderError, RenderFrame, Renderer, SessionSummary};
use crate::version;

/// Height ramp shared by sparklines and the history buffers that feed them.
pub const RAMP: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const BAR_WIDTH: usize = 20;

/// Fixed-width usage bar for a 0-100 value.
pub fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64)
        .round()
        .clamp(0.0, width as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Map bucket heights (0..RAMP.len()) to block characters.
pub fn sparkline(heights: &[usize]) -> String {
    heights.iter().map(|&h| RAMP[h.min(RAMP.len() - 1)]).collect()
}

fn level_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Normal => Color::Reset,
        AlertLevel::Caution => Color::Yellow,
        AlertLevel::Warning => Color::DarkYellow,
        AlertLevel::Critical => Color::Red,
    }
}

fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Session stats table. Recomputed only on slow ticks; the cached string
/// is reprinted in between.
fn stats_block(stats: &[crate::stats::RunningStats]) -> String {
    use std::fmt::Write as _;

    let mut block = String::new();
    let _ = writeln!(block, "{:<11}{:>9}{:>9}{:>9}", "session", "mean", "max", "n");
    for metric in Metric::ALL {
        let s = &stats[metric.index()];
        if s.count() == 0 {
            continue;
        }
        let _ = writeln!(
            block,
            "{:<11}{:>9.1}{:>9.1}{:>9}",
            metric.label(),
            s.mean(),
            s.max(),
            s.count()
        );
    }
    block
}

pub struct ConsoleRenderer {
    out: Stdout,
    started: Instant,
    stats_block: String,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
            started: Instant::now(),
            stats_block: String::new(),
        }
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        if frame.slow_tick {
            self.stats_block = stats_block(frame.stats);
        }

        let mut out = self.out.lock();
        queue!(
            out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;

        writeln!(
            out,
            "{}  up {}  tick {}",
            version::banner(),
            format_uptime(self.started.elapsed()),
            frame.tick
        )?;
        writeln!(out)?;

        for metric in Metric::ALL {
            let level = frame.level_for(metric);
            let value = frame.sample.value(metric);
            let heights = frame.history_for(metric).render_heights(RAMP.len());

            write!(out, "{:<11}", metric.label())?;
            match value {
                Some(v) => write!(out, "{:>8.1} {:<5}", v, metric.unit())?,
                None => write!(out, "{:>8} {:<5}", "-", metric.unit())?,
            }
            match value {
                Some(v) if metric.is_percent() => write!(out, " [{}]", bar(v, BAR_WIDTH))?,
                _ => write!(out, " {:w$}", "", w = BAR_WIDTH + 2)?,
            }
            write!(out, "  {}", sparkline(&heights))?;
            if level > AlertLevel::Normal {
                queue!(out, style::SetForegroundColor(level_color(level)))?;
                write!(out, "  {}", level.label())?;
                queue!(out, style::ResetColor)?;
            }
            writeln!(out)?;
        }

        writeln!(out)?;
        write!(out, "{}", self.stats_block)?;

        if !frame.events.is_empty() {
            writeln!(out)?;
            writeln!(out, "alerts:")?;
            for ev in frame.events {
                queue!(out, style::SetForegroundColor(level_color(ev.level)))?;
                writeln!(
                    out,
                    "  {} {}: {:.1} exceeds {:.1}",
                    ev.metric.label(),
                    ev.level.label(),
                    ev.value,
                    ev.threshold
                )?;
                queue!(out, style::ResetColor)?;
            }
            if frame.events.iter().any(|ev| ev.level == AlertLevel::Critical) {
                // Terminal bell for critical pressure.
                write!(out, "\x07")?;
            }
        }

        out.flush()?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), RenderError> {
        let mut out = self.out.lock();
        execute!(
            out,
            style::ResetColor,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Show
        )?;
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) {
        let mut out = self.out.lock();
        let _ = execute!(out, cursor::Show, style::ResetColor);
        let _ = writeln!(
            out,
            "session: {} ticks, {} skipped, {} samples logged, {} alerts",
            summary.ticks, summary.ticks_skipped, summary.samples_logged, summary.alerts_raised
        );
        let _ = out.flush();
    }
}
