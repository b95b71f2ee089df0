//! Pure session-clock arithmetic.
//!
//! Remaining time is always recomputed from the absolute login timestamp,
//! never decremented incrementally, so a 1-second polling cadence cannot
//! accumulate drift.

use crate::session::SessionRecord;
use crate::time::now_millis;

/// Seconds left in the session at the given instant (epoch milliseconds).
///
/// Computed as `max(0, sessionDuration - floor((now - loginTimestamp) / 1000))`.
/// Never negative; safe against a wall clock that sits before the login
/// instant (the session simply reads as full).
#[must_use]
pub fn remaining_at(record: &SessionRecord, now_ms: i64) -> u64 {
    let elapsed_secs = (now_ms - record.login_timestamp).div_euclid(1000);
    let remaining = record.session_duration as i64 - elapsed_secs;
    remaining.clamp(0, record.session_duration as i64) as u64
}

/// Seconds left in the session right now.
#[must_use]
pub fn remaining(record: &SessionRecord) -> u64 {
    remaining_at(record, now_millis())
}
