//! Exchange log.
//!
//! Appends every request and response the widget sends or receives to a
//! per-run file, with timestamps. Diagnostics go through the `log` facade;
//! this file is the raw wire record.

use chrono::Utc;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// Which way a logged line travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Recv,
    Error,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Send => "SEND",
            Direction::Recv => "RECV",
            Direction::Error => "ERROR",
        }
    }
}

/// Thread-safe handle to an append-only exchange log.
///
/// Cloning shares the same file. A disabled log accepts writes and drops them.
#[derive(Debug, Clone, Default)]
pub struct ExchangeLog {
    file: Arc<Mutex<Option<File>>>,
}

impl ExchangeLog {
    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open (or create) `{log_dir}/{run_id}.log`.
    ///
    /// Falls back to a disabled log when `log_dir` is `None` or the file
    /// cannot be opened.
    pub fn open(log_dir: Option<&Path>, run_id: &str) -> Self {
        let file = log_dir.and_then(|dir| {
            std::fs::create_dir_all(dir).ok()?;
            let path = dir.join(format!("{}.log", run_id));
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("Failed to open exchange log {}: {}", path.display(), e);
                    None
                }
            }
        });
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Write one timestamped line.
    pub fn record(&self, direction: Direction, data: &str) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(ref mut file) = *guard {
                let _ = writeln!(file, "[{}] {}: {}", utc_timestamp(), direction.as_str(), data);
                let _ = file.flush();
            }
        }
    }
}

/// Fresh identifier for naming a run's log file.
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as ISO 8601 with milliseconds (e.g. 2026-02-04T10:15:30.123Z).
fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn utc_timestamp_format() {
        let ts = utc_timestamp();
        // YYYY-MM-DDTHH:MM:SS.mmmZ
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), 24);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }

    #[test]
    fn direction_labels() {
        assert_eq!(Direction::Send.as_str(), "SEND");
        assert_eq!(Direction::Recv.as_str(), "RECV");
        assert_eq!(Direction::Error.as_str(), "ERROR");
    }

    #[test]
    fn open_creates_file() {
        let dir = tempdir().unwrap();
        let log = ExchangeLog::open(Some(dir.path()), "run-1");

        assert!(log.is_enabled());
        assert!(dir.path().join("run-1.log").exists());
    }

    #[test]
    fn open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("logs").join("baak");
        let log = ExchangeLog::open(Some(&nested), "run-2");

        assert!(log.is_enabled());
        assert!(nested.join("run-2.log").exists());
    }

    #[test]
    fn no_dir_means_disabled() {
        let log = ExchangeLog::open(None, "run-3");
        assert!(!log.is_enabled());
    }

    #[test]
    fn record_appends_lines() {
        let dir = tempdir().unwrap();
        let log = ExchangeLog::open(Some(dir.path()), "run-4");
        log.record(Direction::Send, "POST /api/chat {\"question\":\"halo\"}");
        log.clone().record(Direction::Recv, "200 {\"answer\":\"hai\"}");

        let contents = fs::read_to_string(dir.path().join("run-4.log")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("SEND: POST /api/chat"));
        assert!(lines[1].contains("RECV: 200"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn disabled_log_ignores_writes() {
        // Should not panic
        ExchangeLog::disabled().record(Direction::Error, "dropped");
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(new_run_id(), new_run_id());
    }
}
