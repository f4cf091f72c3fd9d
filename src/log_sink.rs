// CSV sample log: append-only, one row per tick.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::instrument;

use crate::models::Sample;
use crate::monitor::{LogSink, SinkError};

pub const CSV_HEADER: &str = "Timestamp,CPU(%),RAM(%),Disk(%),RAM_Available(MB),Network_Sent(KB/s),Network_Received(KB/s),Disk_Read(KB/s),Disk_Write(KB/s)";

pub struct CsvLogSink {
    writer: BufWriter<File>,
}

impl CsvLogSink {
    /// Opens `path` for appending, writing the header row first when the
    /// file is new or empty.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);
        if needs_header {
            writeln!(writer, "{}", CSV_HEADER)?;
            writer.flush()?;
        }
        Ok(Self { writer })
    }
}

impl LogSink for CsvLogSink {
    /// One row per sample, flushed immediately so an abrupt exit loses at
    /// most the row being written. Unavailable metrics become empty cells.
    #[instrument(skip(self, sample), fields(sink = "csv", operation = "append_sample"))]
    fn append(&mut self, sample: &Sample) -> Result<(), SinkError> {
        let ts = DateTime::from_timestamp_millis(sample.timestamp_ms as i64)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&Local);
        write!(
            self.writer,
            "{},{:.1},{:.1},{:.1},{}",
            ts.format("%Y-%m-%d %H:%M:%S"),
            sample.cpu_percent,
            sample.ram_percent,
            sample.disk_percent,
            sample.ram_available_mb
        )?;
        for value in [
            sample.net_sent_kbps,
            sample.net_recv_kbps,
            sample.disk_read_kbps,
            sample.disk_write_kbps,
        ] {
            match value {
                Some(v) => write!(self.writer, ",{:.1}", v)?,
                None => write!(self.writer, ",")?,
            }
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
