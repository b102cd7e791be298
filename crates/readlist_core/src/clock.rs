//! Wall-clock helpers. All persisted timestamps are epoch milliseconds.

use std::time::{SystemTime, UNIX_EPOCH};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Returns the current time in epoch milliseconds.
///
/// Clocks set before the unix epoch read as `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Converts whole days to milliseconds.
pub fn days_to_ms(days: i64) -> i64 {
    days.saturating_mul(MILLIS_PER_DAY)
}
