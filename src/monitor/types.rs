use serde::{Deserialize, Serialize};

/// Read-only view of the counter. `remaining` goes negative once the limit
/// is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub calls: u64,
    pub limit: u64,
    pub remaining: i64,
}

/// Returned by an increment that leaves usage at or above the warning
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotaWarning {
    pub calls: u64,
    pub limit: u64,
    pub fraction: f64,
}
