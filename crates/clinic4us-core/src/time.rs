//! Epoch-millisecond helpers for session timestamps.
//!
//! The persisted session record carries both an RFC 3339 `loginTime` and an
//! epoch-millisecond `loginTimestamp`; all remaining-time arithmetic is done
//! on the millisecond value so it can never drift from incremental updates.

use crate::error::{CoreError, Result};
use time::OffsetDateTime;

/// Current wall-clock time in UTC.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    to_epoch_millis(OffsetDateTime::now_utc())
}

/// Converts a datetime to epoch milliseconds.
pub fn to_epoch_millis(datetime: OffsetDateTime) -> i64 {
    (datetime.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Converts epoch milliseconds back to a datetime.
pub fn from_epoch_millis(millis: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| CoreError::invalid_timestamp(format!("Invalid epoch millis {millis}: {e}")))
}
