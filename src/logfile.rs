//! Append-only daily log of raw telemetry lines
//!
//! Files live under `<base>/data/<YYYY>/<MM>/<YYYYMMDD>.log`. Each record is
//! the 14-digit timestamp, a space and the raw line.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::telemetry::SampleLine;

/// Writer for the per-day log files below a base directory
#[derive(Debug, Clone)]
pub struct DailyLog {
    base: PathBuf,
}

impl DailyLog {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `<base>/data/<YYYY>/<MM>`
    pub fn directory_for(&self, timestamp: &NaiveDateTime) -> PathBuf {
        self.base
            .join("data")
            .join(timestamp.format("%Y").to_string())
            .join(timestamp.format("%m").to_string())
    }

    /// `<base>/data/<YYYY>/<MM>/<YYYYMMDD>.log`
    pub fn path_for(&self, timestamp: &NaiveDateTime) -> PathBuf {
        self.directory_for(timestamp)
            .join(format!("{}.log", timestamp.format("%Y%m%d")))
    }

    /// Append one record to the file of the sample's day
    pub fn append(&self, sample: &SampleLine) -> Result<PathBuf> {
        let directory = self.directory_for(&sample.timestamp);
        fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

        let path = self.path_for(&sample.timestamp);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        writeln!(file, "{}", sample.record())
            .with_context(|| format!("Failed to append to log file: {}", path.display()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_path_layout() {
        let log = DailyLog::new("/var/bean");
        assert_eq!(
            log.path_for(&at(7, 12, 0, 0)),
            PathBuf::from("/var/bean/data/2024/03/20240307.log")
        );
    }

    #[test]
    fn test_append_keeps_receipt_order() {
        let dir = tempdir().unwrap();
        let log = DailyLog::new(dir.path());

        let lines = ["21.5 45.2 10.1 1013.2 3.7", "garbage", "21.6 45.1 10.0 1013.3 3.7"];
        let mut path = PathBuf::new();
        for (i, line) in lines.iter().enumerate() {
            path = log.append(&SampleLine::at(*line, at(7, 12, 0, i as u32))).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let records: Vec<&str> = content.lines().collect();
        assert_eq!(records.len(), lines.len());

        for (record, line) in records.iter().zip(lines) {
            let (stamp, raw) = record.split_once(' ').unwrap();
            assert_eq!(stamp.len(), 14);
            assert!(stamp.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(raw, line);
        }
    }

    #[test]
    fn test_new_day_new_file() {
        let dir = tempdir().unwrap();
        let log = DailyLog::new(dir.path());

        let first = log.append(&SampleLine::at("1 2", at(7, 23, 59, 59))).unwrap();
        let second = log.append(&SampleLine::at("3 4", at(8, 0, 0, 0))).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("data/2024/03/20240308.log"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "20240307235959 1 2\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "20240308000000 3 4\n");
    }
}
