//! Wall-clock source for write timestamps.
//!
//! Services stamp `created_at`, `completed_at` and `deleted_at` through a
//! `Clock` so tests can pin time.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current time in Unix epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Current system time in Unix epoch milliseconds (0 if the clock is before 1970).
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub fn system_clock() -> Clock {
    Arc::new(now_epoch_ms)
}

/// Clock that always reports `epoch_ms`.
pub fn fixed_clock(epoch_ms: i64) -> Clock {
    Arc::new(move || epoch_ms)
}
