use super::{QuotaWarning, UsageSnapshot};
use crate::{Error, Result, config::MonitorConfig, config::work_dir_path};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Marker preceding the running total on every usage log line.
pub const USAGE_LOG_MARKER: &str = "Total calls:";

pub const DEFAULT_LOG_FILE: &str = "api_usage.log";

/// Process-local count of remote calls, restored from and appended to a
/// text log of `<timestamp> - Total calls: <n>` lines.
///
/// Persistence is best effort: read and write failures are logged and the
/// in-memory count stays authoritative. There is no cross-process locking;
/// concurrent writers to one log may leave a stale last line.
#[derive(Debug)]
pub struct UsageMonitor {
    calls: u64,
    limit: u64,
    warning_threshold: f64,
    log_path: PathBuf,
}

impl UsageMonitor {
    pub fn new(limit: u64, warning_threshold: f64, log_path: impl Into<PathBuf>) -> Result<Self> {
        if limit == 0 {
            return Err(Error::config("Usage limit must be greater than 0"));
        }
        if !(warning_threshold > 0.0 && warning_threshold <= 1.0) {
            return Err(Error::config(format!(
                "Warning threshold must be in (0, 1], got {warning_threshold}"
            )));
        }

        let mut monitor = Self {
            calls: 0,
            limit,
            warning_threshold,
            log_path: log_path.into(),
        };
        monitor.load();
        Ok(monitor)
    }

    /// Builds a monitor from config, defaulting the log to `~/work/api_usage.log`.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let log_path = match &config.log_path {
            Some(path) => path.clone(),
            None => work_dir_path(DEFAULT_LOG_FILE)?,
        };
        Self::new(config.limit, config.warning_threshold, log_path)
    }

    fn load(&mut self) {
        match read_last_total(&self.log_path) {
            Ok(Some(total)) => {
                debug!(
                    "Restored {} calls from usage log {}",
                    total,
                    self.log_path.display()
                );
                self.calls = total;
            }
            Ok(None) => {
                debug!("No previous usage found at {}", self.log_path.display());
            }
            Err(e) => {
                warn!("Could not load previous usage: {}", e);
            }
        }
    }

    /// Discards the in-memory count and reloads it from the log.
    pub fn reset(&mut self) {
        self.calls = 0;
        self.load();
    }

    /// Adds `count` calls and appends the new total to the log.
    ///
    /// Returns a [`QuotaWarning`] whenever the new total is at or above
    /// `warning_threshold` of the limit. Never blocks the caller.
    pub fn increment(&mut self, count: u64) -> Option<QuotaWarning> {
        self.calls = self.calls.saturating_add(count);

        if let Err(e) = self.append_log_line() {
            error!("Could not log usage: {}", e);
        }

        let fraction = self.calls as f64 / self.limit as f64;
        if fraction >= self.warning_threshold {
            warn!(
                calls = self.calls,
                limit = self.limit,
                "API usage warning: {}/{} calls ({:.1}%)",
                group_thousands(self.calls as i128),
                group_thousands(self.limit as i128),
                fraction * 100.0
            );
            return Some(QuotaWarning {
                calls: self.calls,
                limit: self.limit,
                fraction,
            });
        }
        None
    }

    fn append_log_line(&self) -> io::Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        writeln!(file, "{} - {} {}", timestamp, USAGE_LOG_MARKER, self.calls)
    }

    pub fn usage(&self) -> UsageSnapshot {
        UsageSnapshot {
            calls: self.calls,
            limit: self.limit,
            remaining: self.remaining(),
        }
    }

    fn remaining(&self) -> i64 {
        let remaining = self.limit as i128 - self.calls as i128;
        remaining.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl fmt::Display for UsageMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API Usage: {}/{} calls ({} remaining)",
            group_thousands(self.calls as i128),
            group_thousands(self.limit as i128),
            group_thousands(self.remaining() as i128)
        )
    }
}

/// Total recorded on the last marker line of the log. A missing log is
/// `Ok(None)`; an unreadable log or unparsable total is an error.
fn read_last_total(path: &Path) -> Result<Option<u64>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let Some(line) = contents
        .lines()
        .rev()
        .find(|line| line.contains(USAGE_LOG_MARKER))
    else {
        return Ok(None);
    };

    let total = line
        .rsplit(USAGE_LOG_MARKER)
        .next()
        .map(str::trim)
        .unwrap_or_default();
    total.parse::<u64>().map(Some).map_err(|e| {
        Error::internal(format!("Malformed usage log line '{line}': {e}"))
    })
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
