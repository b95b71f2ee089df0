//! Page access policy.
//!
//! A pure function of the requested page and the current session record.
//! Public pages are always allowed; private pages require a non-expired
//! session; the printable clinical reports additionally require a clinical
//! role; every other private page must appear in the session's permitted
//! menu set.

use clinic4us_core::{Page, SessionRecord, time::now_millis};

/// Result of a page access evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is granted.
    Allow,
    /// Access is denied with a reason.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns `true` if access was denied.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// Get the deny reason if access was denied.
    #[must_use]
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Deny(reason) => Some(reason),
            Self::Allow => None,
        }
    }
}

/// Why a page was denied. Navigational, not an error: always recoverable
/// via redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session exists.
    NotAuthenticated,
    /// A session exists but its time ran out.
    SessionExpired,
    /// The page needs a clinical role the session does not hold.
    RoleNotPermitted,
    /// The page is not in the session's permitted menu set.
    PageNotPermitted,
}

/// The page access policy.
pub struct PageAccessPolicy;

impl PageAccessPolicy {
    /// Evaluates access for `page` given the current session.
    #[must_use]
    pub fn evaluate(page: Page, session: Option<&SessionRecord>) -> AccessDecision {
        Self::evaluate_at(page, session, now_millis())
    }

    /// Evaluates access at an explicit instant (epoch milliseconds).
    #[must_use]
    pub fn evaluate_at(page: Page, session: Option<&SessionRecord>, now_ms: i64) -> AccessDecision {
        if page.is_public() {
            return AccessDecision::Allow;
        }
        let Some(record) = session else {
            return AccessDecision::Deny(DenyReason::NotAuthenticated);
        };
        if record.is_expired_at(now_ms) {
            return AccessDecision::Deny(DenyReason::SessionExpired);
        }
        if page.requires_clinical_role() {
            return if record.role.is_clinical() {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::RoleNotPermitted)
            };
        }
        if record.permits(page) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny(DenyReason::PageNotPermitted)
        }
    }

    /// Convenience boolean form of [`Self::evaluate`].
    #[must_use]
    pub fn allows(page: Page, session: Option<&SessionRecord>) -> bool {
        Self::evaluate(page, session).is_allowed()
    }
}
