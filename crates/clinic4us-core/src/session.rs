//! The current-session record.
//!
//! Exactly one record is "current" per client context. Login, renewal, and
//! profile switches replace it atomically; logout and passive expiry destroy
//! it. The persisted JSON document uses the camelCase field names of the
//! stored-state contract (`alias`, `clinicName`, `loginTime`,
//! `loginTimestamp`, `sessionDuration`, `clinic`).

use crate::page::Page;
use crate::role::Role;
use crate::time::{now_millis, now_utc, to_epoch_millis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// Snapshot of who is logged in, since when, for how long, and under which
/// clinic/role context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Login email of the authenticated identity.
    pub email: String,

    /// Display name shown in the header.
    pub alias: String,

    /// Name of the clinic the session is scoped to.
    pub clinic_name: String,

    /// Role held within the current clinic context.
    pub role: Role,

    /// Page identifiers the session's menu grants access to.
    pub permissions: BTreeSet<String>,

    /// Login instant as an RFC 3339 string (display/audit).
    #[serde(with = "time::serde::rfc3339")]
    pub login_time: OffsetDateTime,

    /// Login instant as epoch milliseconds (remaining-time arithmetic).
    pub login_timestamp: i64,

    /// Session duration in seconds. Always positive.
    pub session_duration: u64,

    /// Optional clinic identifier/slug carried back to the login URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic: Option<String>,
}

impl SessionRecord {
    /// Creates a record starting now.
    ///
    /// `session_duration` must be positive; a zero-length session would be
    /// born expired.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        alias: impl Into<String>,
        clinic_name: impl Into<String>,
        role: Role,
        session_duration: u64,
    ) -> Self {
        debug_assert!(session_duration > 0, "session duration must be positive");
        let now = now_utc();
        Self {
            email: email.into(),
            alias: alias.into(),
            clinic_name: clinic_name.into(),
            role,
            permissions: role
                .menu_pages()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            login_time: now,
            login_timestamp: to_epoch_millis(now),
            session_duration,
            clinic: None,
        }
    }

    /// Resets the login instant to now.
    ///
    /// Used by renewal and profile switches; the timestamp is monotonically
    /// non-decreasing across these refreshes.
    pub fn refresh(&mut self) {
        let now = now_utc();
        self.login_time = now;
        self.login_timestamp = to_epoch_millis(now);
    }

    /// Returns `true` if the session had no time left at `now_ms`.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        crate::clock::remaining_at(self, now_ms) == 0
    }

    /// Returns `true` if the session has no time left.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    /// Returns `true` if the menu permission set contains the page.
    #[must_use]
    pub fn permits(&self, page: Page) -> bool {
        self.permissions.contains(page.as_str())
    }
}
