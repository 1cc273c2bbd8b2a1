//! Append-only operational log
//!
//! One timestamped text line per record, no rotation, no structured
//! fields. This is an experiment artifact kept alongside the tracing
//! output, matching the paper-trail requirements of a trial run.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use tracing::error;

use crossway_core::{CrosswayError, CrosswayResult};

/// Timestamped append-only text log
pub struct OperationLog {
    file: File,
}

impl OperationLog {
    /// Open (or create) the log file for appending
    pub fn open(path: &Path) -> CrosswayResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CrosswayError::LogWriteFailed(e.to_string()))?;
        Ok(OperationLog { file })
    }

    /// Append one timestamped line. Write failures are logged and
    /// swallowed: a lost log line must never take down the experiment.
    pub fn append(&mut self, message: &str) {
        let timestamp = humantime::format_rfc3339_seconds(SystemTime::now());
        if let Err(e) = writeln!(self.file, "{}: {}", timestamp, message) {
            error!(error = %e, "operational log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_timestamped_lines() {
        let dir = std::env::temp_dir().join("crossway-log-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("server_log_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let mut log = OperationLog::open(&path).unwrap();
            log.append("Server started.");
            log.append("Broadcasted condition: 7");
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Server started."));
        assert!(lines[1].ends_with("Broadcasted condition: 7"));
        // Each line starts with an RFC3339 timestamp
        assert!(lines[0].contains("T"));
        assert!(lines[0].contains(": "));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reopen_appends() {
        let dir = std::env::temp_dir().join("crossway-log-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("server_log_reopen_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        OperationLog::open(&path).unwrap().append("first");
        OperationLog::open(&path).unwrap().append("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
