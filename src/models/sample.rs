// One tick's metric readings

use serde::{Deserialize, Serialize};

/// Identifier for each tracked metric, in log-column order.
///
/// `Metric::ALL` and `index()` agree, so per-metric tables can be plain
/// slices indexed by `metric.index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Cpu,
    Ram,
    Disk,
    RamAvailable,
    NetSent,
    NetRecv,
    DiskRead,
    DiskWrite,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Cpu,
        Metric::Ram,
        Metric::Disk,
        Metric::RamAvailable,
        Metric::NetSent,
        Metric::NetRecv,
        Metric::DiskRead,
        Metric::DiskWrite,
    ];

    /// Metrics expressed as a percentage of capacity; only these are
    /// classified against the alert thresholds.
    pub const PERCENT: [Metric; 3] = [Metric::Cpu, Metric::Ram, Metric::Disk];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in `ALL`; stable across the process lifetime.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Ram => "RAM",
            Metric::Disk => "Disk",
            Metric::RamAvailable => "RAM free",
            Metric::NetSent => "Net sent",
            Metric::NetRecv => "Net recv",
            Metric::DiskRead => "Disk read",
            Metric::DiskWrite => "Disk write",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Cpu | Metric::Ram | Metric::Disk => "%",
            Metric::RamAvailable => "MB",
            Metric::NetSent | Metric::NetRecv | Metric::DiskRead | Metric::DiskWrite => "KB/s",
        }
    }

    pub fn is_percent(self) -> bool {
        matches!(self, Metric::Cpu | Metric::Ram | Metric::Disk)
    }
}

/// Immutable snapshot of all tracked metrics for a single tick.
///
/// Optional fields are `None` when the source could not measure them this
/// tick (no active interface, no readable I/O counters) - distinct from a
/// measured zero. Required metrics failing to read is a source error, so
/// they are plain values here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Epoch milliseconds at the moment the sample was taken.
    pub timestamp_ms: u64,
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
    pub ram_available_mb: u64,
    pub net_sent_kbps: Option<f64>,
    pub net_recv_kbps: Option<f64>,
    pub disk_read_kbps: Option<f64>,
    pub disk_write_kbps: Option<f64>,
}

impl Sample {
    /// The value of one metric, `None` when unavailable this tick.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cpu => Some(self.cpu_percent),
            Metric::Ram => Some(self.ram_percent),
            Metric::Disk => Some(self.disk_percent),
            Metric::RamAvailable => Some(self.ram_available_mb as f64),
            Metric::NetSent => self.net_sent_kbps,
            Metric::NetRecv => self.net_recv_kbps,
            Metric::DiskRead => self.disk_read_kbps,
            Metric::DiskWrite => self.disk_write_kbps,
        }
    }
}
