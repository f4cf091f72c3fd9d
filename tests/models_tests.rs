// Model serialization and metric lookup tests

use hostmon::models::*;

fn sample() -> Sample {
    Sample {
        timestamp_ms: 1_700_000_000_000,
        cpu_percent: 12.5,
        ram_percent: 61.0,
        disk_percent: 70.25,
        ram_available_mb: 3521,
        net_sent_kbps: Some(12.3),
        net_recv_kbps: Some(48.9),
        disk_read_kbps: None,
        disk_write_kbps: None,
    }
}

#[test]
fn test_sample_serialization_camel_case() {
    let json = serde_json::to_string(&sample()).unwrap();
    assert!(json.contains("\"timestampMs\""));
    assert!(json.contains("\"cpuPercent\""));
    assert!(json.contains("\"ramAvailableMb\""));
    assert!(json.contains("\"netSentKbps\""));
    let back: Sample = serde_json::from_str(&json).unwrap();
    assert_eq!(back.timestamp_ms, 1_700_000_000_000);
    assert_eq!(back.cpu_percent, 12.5);
    assert_eq!(back.disk_read_kbps, None);
}

#[test]
fn test_sample_value_lookup() {
    let s = sample();
    assert_eq!(s.value(Metric::Cpu), Some(12.5));
    assert_eq!(s.value(Metric::Ram), Some(61.0));
    assert_eq!(s.value(Metric::Disk), Some(70.25));
    assert_eq!(s.value(Metric::RamAvailable), Some(3521.0));
    assert_eq!(s.value(Metric::NetSent), Some(12.3));
    assert_eq!(s.value(Metric::NetRecv), Some(48.9));
    assert_eq!(s.value(Metric::DiskRead), None);
    assert_eq!(s.value(Metric::DiskWrite), None);
}

#[test]
fn test_metric_index_matches_all_order() {
    assert_eq!(Metric::COUNT, 8);
    for (i, metric) in Metric::ALL.into_iter().enumerate() {
        assert_eq!(metric.index(), i);
    }
}

#[test]
fn test_metric_percent_classification() {
    for metric in Metric::PERCENT {
        assert!(metric.is_percent());
        assert_eq!(metric.unit(), "%");
    }
    assert!(!Metric::RamAvailable.is_percent());
    assert_eq!(Metric::RamAvailable.unit(), "MB");
    assert_eq!(Metric::NetSent.unit(), "KB/s");
    assert_eq!(Metric::DiskWrite.unit(), "KB/s");
}

#[test]
fn test_metric_labels_unique() {
    let labels: Vec<&str> = Metric::ALL.into_iter().map(|m| m.label()).collect();
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_alert_level_ordering() {
    assert!(AlertLevel::Normal < AlertLevel::Caution);
    assert!(AlertLevel::Caution < AlertLevel::Warning);
    assert!(AlertLevel::Warning < AlertLevel::Critical);
    assert_eq!(
        [
            AlertLevel::Critical,
            AlertLevel::Normal,
            AlertLevel::Warning
        ]
        .into_iter()
        .max(),
        Some(AlertLevel::Critical)
    );
}

#[test]
fn test_alert_event_serialization_camel_case() {
    let ev = AlertEvent {
        metric: Metric::Cpu,
        level: AlertLevel::Critical,
        value: 97.3,
        threshold: 90.0,
    };
    let json = serde_json::to_string(&ev).unwrap();
    assert!(json.contains("\"metric\""));
    assert!(json.contains("\"Critical\""));
    assert!(json.contains("\"threshold\""));
    let back: AlertEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ev);
}
