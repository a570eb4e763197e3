//! Wall-clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as Unix seconds.
#[allow(clippy::cast_possible_wrap)]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
