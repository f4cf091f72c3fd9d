use serde::Deserialize;

use crate::alert::Thresholds;
use crate::monitor::MonitorConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Trend window length per metric, in samples.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Expensive display sections refresh every N-th tick.
    #[serde(default = "default_slow_refresh_divisor")]
    pub slow_refresh_divisor: u64,
    /// How often to log loop counters (ticks, skips, alerts) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_refresh_interval_ms() -> u64 {
    2000
}

fn default_history_capacity() -> usize {
    30
}

fn default_slow_refresh_divisor() -> u64 {
    4
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            history_capacity: default_history_capacity(),
            slow_refresh_divisor: default_slow_refresh_divisor(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_caution_percent")]
    pub caution_percent: f64,
    #[serde(default = "default_warning_percent")]
    pub warning_percent: f64,
    #[serde(default = "default_critical_percent")]
    pub critical_percent: f64,
    /// When true, an alert fires only on the tick a metric enters a higher
    /// level; when false, it fires on every elevated tick.
    #[serde(default)]
    pub edge_triggered_alerts: bool,
}

fn default_caution_percent() -> f64 {
    60.0
}

fn default_warning_percent() -> f64 {
    80.0
}

fn default_critical_percent() -> f64 {
    90.0
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            caution_percent: default_caution_percent(),
            warning_percent: default_warning_percent(),
            critical_percent: default_critical_percent(),
            edge_triggered_alerts: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_logging")]
    pub enable_logging: bool,
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

fn default_enable_logging() -> bool {
    true
}

fn default_log_path() -> String {
    "resource_log.csv".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_logging: default_enable_logging(),
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    /// Absent means auto-detect from the visible interfaces.
    #[serde(default)]
    pub monitoring_enabled: Option<bool>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found, using defaults");
                Self::load_from_str("")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.refresh_interval_ms > 0,
            "monitoring.refresh_interval_ms must be > 0, got {}",
            self.monitoring.refresh_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.history_capacity > 0,
            "monitoring.history_capacity must be > 0, got {}",
            self.monitoring.history_capacity
        );
        anyhow::ensure!(
            self.monitoring.slow_refresh_divisor > 0,
            "monitoring.slow_refresh_divisor must be > 0, got {}",
            self.monitoring.slow_refresh_divisor
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.thresholds.caution_percent > 0.0,
            "thresholds.caution_percent must be > 0, got {}",
            self.thresholds.caution_percent
        );
        anyhow::ensure!(
            self.thresholds.caution_percent < self.thresholds.warning_percent
                && self.thresholds.warning_percent < self.thresholds.critical_percent,
            "thresholds must be strictly ascending, got {} / {} / {}",
            self.thresholds.caution_percent,
            self.thresholds.warning_percent,
            self.thresholds.critical_percent
        );
        anyhow::ensure!(
            self.thresholds.critical_percent <= 100.0,
            "thresholds.critical_percent must be <= 100, got {}",
            self.thresholds.critical_percent
        );
        if self.logging.enable_logging {
            anyhow::ensure!(
                !self.logging.log_path.is_empty(),
                "logging.log_path must be non-empty when logging is enabled"
            );
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            caution: self.thresholds.caution_percent,
            warning: self.thresholds.warning_percent,
            critical: self.thresholds.critical_percent,
        }
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            refresh_interval_ms: self.monitoring.refresh_interval_ms,
            history_capacity: self.monitoring.history_capacity,
            slow_refresh_divisor: self.monitoring.slow_refresh_divisor,
            stats_log_interval_secs: self.monitoring.stats_log_interval_secs,
            thresholds: self.thresholds(),
            edge_triggered_alerts: self.thresholds.edge_triggered_alerts,
        }
    }
}
