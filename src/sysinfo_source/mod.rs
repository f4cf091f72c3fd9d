// Host metrics via sysinfo (plus /proc for disk I/O counters).

mod linux;

use std::path::Path;
use std::time::Instant;

use sysinfo::{Disks, Networks, System};
use tracing::instrument;

use crate::models::Sample;
use crate::monitor::{MetricSource, SourceError};

/// Live host metrics. Rate metrics are deltas against the previous read,
/// so the first sample after construction is a baseline the caller should
/// discard.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
    networks: Networks,
    net_enabled: bool,
    last_cpu: Option<(Instant, f64)>,
    last_net: Option<(u64, u64, Instant)>,
    last_disk_io: Option<(u64, u64, Instant)>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SysinfoSource {
    /// `net_override`: `Some` forces network monitoring on or off, `None`
    /// auto-detects from the visible non-loopback interfaces.
    pub fn new(net_override: Option<bool>) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        let detected = networks.list().keys().any(|name| name != "lo");
        let net_enabled = net_override.unwrap_or(detected);
        match net_override {
            Some(true) => tracing::info!("network monitoring forced on"),
            Some(false) => tracing::info!("network monitoring forced off"),
            None => tracing::info!(
                enabled = detected,
                interfaces = networks.list().len(),
                "network monitoring auto-detected"
            ),
        }

        Self {
            sys,
            disks,
            networks,
            net_enabled,
            last_cpu: None,
            last_net: None,
            last_disk_io: None,
        }
    }

    pub fn network_enabled(&self) -> bool {
        self.net_enabled
    }

    fn cpu_percent(&mut self) -> f64 {
        let now = Instant::now();
        let usage = match self.last_cpu {
            Some((prev_ts, prev_usage)) => {
                if now.duration_since(prev_ts) >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
                    self.sys.refresh_cpu_all();
                    let usage = self.sys.global_cpu_usage() as f64;
                    self.last_cpu = Some((now, usage));
                    usage
                } else {
                    // Too soon for a meaningful refresh, reuse the last value.
                    prev_usage
                }
            }
            None => {
                // First refresh establishes the measurement baseline.
                self.sys.refresh_cpu_all();
                self.last_cpu = Some((now, 0.0));
                0.0
            }
        };
        usage.clamp(0.0, 100.0)
    }

    fn ram(&mut self) -> Result<(f64, u64), SourceError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SourceError::Required {
                metric: "ram",
                reason: "total memory reported as 0".into(),
            });
        }
        let available = self.sys.available_memory();
        let used = total.saturating_sub(available);
        let percent = (used as f64 / total as f64) * 100.0;
        Ok((percent, available / (1024 * 1024)))
    }

    /// Usage of the root filesystem, falling back to the largest disk when
    /// no mount point is exactly "/".
    fn disk_percent(&mut self) -> Result<f64, SourceError> {
        self.disks.refresh(false);
        let disk = self
            .disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| self.disks.list().iter().max_by_key(|d| d.total_space()))
            .ok_or_else(|| SourceError::Required {
                metric: "disk",
                reason: "no disks reported".into(),
            })?;
        let total = disk.total_space();
        let available = disk.available_space();
        let used = total.saturating_sub(available);
        Ok(if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        })
    }

    fn network_kbps(&mut self) -> (Option<f64>, Option<f64>) {
        if !self.net_enabled {
            return (None, None);
        }
        self.networks.refresh(true);
        let mut tx_total: u64 = 0;
        let mut rx_total: u64 = 0;
        for data in self.networks.list().values() {
            tx_total += data.total_transmitted();
            rx_total += data.total_received();
        }

        let now = Instant::now();
        let rates = match self.last_net {
            Some((prev_tx, prev_rx, prev_ts)) => {
                let dt = now.duration_since(prev_ts).as_secs_f64();
                if dt > 0.0 {
                    (
                        Some(tx_total.saturating_sub(prev_tx) as f64 / dt / 1024.0),
                        Some(rx_total.saturating_sub(prev_rx) as f64 / dt / 1024.0),
                    )
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };
        self.last_net = Some((tx_total, rx_total, now));
        rates
    }

    fn disk_io_kbps(&mut self) -> (Option<f64>, Option<f64>) {
        let Some((read_total, write_total)) = linux::read_disk_io_totals() else {
            tracing::debug!("disk I/O counters unavailable");
            return (None, None);
        };

        let now = Instant::now();
        let rates = match self.last_disk_io {
            Some((prev_read, prev_write, prev_ts)) => {
                let dt = now.duration_since(prev_ts).as_secs_f64();
                if dt > 0.0 {
                    (
                        Some(read_total.saturating_sub(prev_read) as f64 / dt / 1024.0),
                        Some(write_total.saturating_sub(prev_write) as f64 / dt / 1024.0),
                    )
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };
        self.last_disk_io = Some((read_total, write_total, now));
        rates
    }
}

impl MetricSource for SysinfoSource {
    #[instrument(skip(self), fields(source = "sysinfo", operation = "read_sample"))]
    fn read(&mut self) -> Result<Sample, SourceError> {
        let cpu_percent = self.cpu_percent();
        let (ram_percent, ram_available_mb) = self.ram()?;
        let disk_percent = self.disk_percent()?;
        let (net_sent_kbps, net_recv_kbps) = self.network_kbps();
        let (disk_read_kbps, disk_write_kbps) = self.disk_io_kbps();

        Ok(Sample {
            timestamp_ms: chrono::Utc::now().timestamp_millis() as u64,
            cpu_percent,
            ram_percent,
            disk_percent,
            ram_available_mb,
            net_sent_kbps,
            net_recv_kbps,
            disk_read_kbps,
            disk_write_kbps,
        })
    }
}
