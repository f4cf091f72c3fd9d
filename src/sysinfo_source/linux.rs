// Linux-specific helpers: /proc/diskstats I/O counters.

// /proc/diskstats sector counts are always 512-byte units.
const SECTOR_SIZE: u64 = 512;

/// Cumulative (bytes_read, bytes_written) across physical block devices
/// from /proc/diskstats (Linux), or None if unavailable.
pub(super) fn read_disk_io_totals() -> Option<(u64, u64)> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/diskstats").ok()?;
        return parse_diskstats(&content);
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Sum sectors read/written over whole devices and convert to bytes.
/// Virtual devices and partitions are excluded so a busy sda1 is not
/// counted on top of sda.
fn parse_diskstats(content: &str) -> Option<(u64, u64)> {
    let mut devices: Vec<(&str, u64, u64)> = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        let name = fields[2];
        if name.starts_with("loop") || name.starts_with("ram") || name.starts_with("zram") {
            continue;
        }
        let (Ok(sectors_read), Ok(sectors_written)) =
            (fields[5].parse::<u64>(), fields[9].parse::<u64>())
        else {
            continue;
        };
        devices.push((name, sectors_read, sectors_written));
    }

    let mut read_bytes: u64 = 0;
    let mut write_bytes: u64 = 0;
    let mut seen = false;
    for &(name, sectors_read, sectors_written) in &devices {
        if devices
            .iter()
            .any(|&(other, _, _)| is_partition_of(name, other))
        {
            continue;
        }
        read_bytes += sectors_read * SECTOR_SIZE;
        write_bytes += sectors_written * SECTOR_SIZE;
        seen = true;
    }
    seen.then_some((read_bytes, write_bytes))
}

/// "sda1" is a partition of "sda"; "nvme0n1p2" of "nvme0n1".
fn is_partition_of(name: &str, device: &str) -> bool {
    if name.len() <= device.len() || !name.starts_with(device) {
        return false;
    }
    let suffix = &name[device.len()..];
    let suffix = suffix.strip_prefix('p').unwrap_or(suffix);
    !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISKSTATS: &str = "\
 259       0 nvme0n1 1000 0 2048 500 2000 0 4096 700 0 900 1200 0 0 0 0 0 0
 259       1 nvme0n1p1 400 0 1024 200 800 0 2048 300 0 400 500 0 0 0 0 0 0
   8       0 sda 10 0 16 5 20 0 32 9 0 12 14 0 0 0 0 0 0
   7       0 loop0 99 0 99999 0 0 0 0 0 0 0 0 0 0 0 0 0 0
";

    #[test]
    fn sums_whole_devices_only() {
        let (read, write) = parse_diskstats(DISKSTATS).unwrap();
        assert_eq!(read, (2048 + 16) * 512);
        assert_eq!(write, (4096 + 32) * 512);
    }

    #[test]
    fn skips_malformed_lines() {
        let (read, write) =
            parse_diskstats("garbage\n 8 0 sdb 1 0 10 0 1 0 20 0 0 0 0\n").unwrap();
        assert_eq!(read, 10 * 512);
        assert_eq!(write, 20 * 512);
    }

    #[test]
    fn empty_when_no_physical_devices() {
        assert!(parse_diskstats(" 7 0 loop0 1 0 8 0 1 0 8 0 0 0 0\n").is_none());
    }
}
