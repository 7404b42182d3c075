mod types;
mod usage;

pub use types::{QuotaWarning, UsageSnapshot};
pub use usage::{DEFAULT_LOG_FILE, USAGE_LOG_MARKER, UsageMonitor};
