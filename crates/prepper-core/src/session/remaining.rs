//! Side-effect free countdown queries for display

use crate::clock::Clock;
use crate::session::SessionClock;
use crate::store::KeyValueStore;
use crate::SESSION_TIMEOUT_MS;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

/// Milliseconds left for an idle period that started at `start_epoch_millis`
///
/// Returns 0 when there is no start. A start in the future (another writer
/// with a skewed clock) is capped at the full timeout.
pub fn remaining_at(start_epoch_millis: Option<i64>, now_millis: i64) -> u64 {
    let Some(start) = start_epoch_millis else {
        return 0;
    };
    let elapsed = now_millis.saturating_sub(start).max(0) as u64;
    SESSION_TIMEOUT_MS.saturating_sub(elapsed)
}

/// Milliseconds left according to the persisted session clock
pub fn get_remaining(store: &dyn KeyValueStore, clock: &dyn Clock) -> u64 {
    let start = SessionClock::load(store).map(|c| c.start_epoch_millis);
    remaining_at(start, clock.now_millis())
}

/// Format a duration as `"{h}h {m}m"` (one hour or more) or `"{m}m"`
pub fn format_remaining(milliseconds: u64) -> String {
    let hours = milliseconds / HOUR_MS;
    let minutes = (milliseconds % HOUR_MS) / MINUTE_MS;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
