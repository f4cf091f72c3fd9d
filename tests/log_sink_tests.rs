// CSV log sink tests

use hostmon::log_sink::{CSV_HEADER, CsvLogSink};
use hostmon::models::Sample;
use hostmon::monitor::LogSink;

fn sample() -> Sample {
    Sample {
        timestamp_ms: 1_700_000_000_000,
        cpu_percent: 12.34,
        ram_percent: 56.78,
        disk_percent: 90.12,
        ram_available_mb: 2048,
        net_sent_kbps: Some(1.5),
        net_recv_kbps: Some(2.26),
        disk_read_kbps: None,
        disk_write_kbps: None,
    }
}

#[test]
fn test_csv_creates_file_with_header() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = CsvLogSink::open(&path).expect("open");
    sink.append(&sample()).expect("append");

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], CSV_HEADER);
}

#[test]
fn test_csv_row_formats_values() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = CsvLogSink::open(&path).expect("open");
    sink.append(&sample()).expect("append");

    let content = std::fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert!(row.contains(",12.3,56.8,90.1,2048,"));
    assert!(row.ends_with(",1.5,2.3,,"));
}

#[test]
fn test_csv_row_timestamp_is_local_time() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = CsvLogSink::open(&path).expect("open");
    let s = sample();
    sink.append(&s).expect("append");

    let expected = chrono::DateTime::from_timestamp_millis(s.timestamp_ms as i64)
        .unwrap()
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let content = std::fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert!(row.starts_with(&expected), "row {row:?} vs {expected:?}");
}

#[test]
fn test_csv_all_optional_metrics_missing_leaves_cells_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = CsvLogSink::open(&path).expect("open");
    let mut s = sample();
    s.net_sent_kbps = None;
    s.net_recv_kbps = None;
    sink.append(&s).expect("append");

    let content = std::fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert!(row.ends_with(",2048,,,,"));
    assert_eq!(row.split(',').count(), CSV_HEADER.split(',').count());
}

#[test]
fn test_csv_reopen_appends_without_second_header() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    {
        let mut sink = CsvLogSink::open(&path).expect("open");
        sink.append(&sample()).expect("append");
    }
    {
        let mut sink = CsvLogSink::open(&path).expect("reopen");
        sink.append(&sample()).expect("append");
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.iter().filter(|l| **l == CSV_HEADER).count(), 1);
}

#[test]
fn test_csv_header_written_into_empty_existing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    std::fs::write(&path, "").unwrap();

    let _sink = CsvLogSink::open(&path).expect("open");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next(), Some(CSV_HEADER));
}
