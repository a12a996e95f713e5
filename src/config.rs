use std::env;

use dotenvy::dotenv;

/// Tunable business limits. Defaults match the product rules (30-day cap,
/// 10-day pending staleness); deployments override via environment.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Longest admissible leave, inclusive day count.
    pub max_duration_days: i64,
    /// Pending requests strictly older than this are swept to CANCELLED.
    pub stale_after_days: i64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_duration_days: 30,
            stale_after_days: 10,
        }
    }
}

impl Policy {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            max_duration_days: env::var("LEAVE_MAX_DURATION_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            stale_after_days: env::var("LEAVE_STALE_AFTER_DAYS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}
