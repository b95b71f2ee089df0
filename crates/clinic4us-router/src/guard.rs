//! The access guard in front of every routed page.
//!
//! Evaluation runs on mount and on every history navigation. While the auth
//! service is still restoring a persisted session the decision is deferred,
//! so a session about to be legitimately restored never flashes the denied
//! view. A denial renders a blocking view whose countdown is purely
//! presentational; re-entering the route re-evaluates the policy.

use clinic4us_core::{Page, SessionRecord, time::now_millis};
use tracing::debug;

use crate::policy::{AccessDecision, DenyReason, PageAccessPolicy};

/// Ticks of the blocking view's redirect countdown (1 second each).
pub const REDIRECT_DELAY_TICKS: u8 = 5;

/// What the guard knows about the auth layer at evaluation time.
#[derive(Debug, Clone, Copy)]
pub enum AuthProbe<'a> {
    /// The auth service has not finished restoring persisted state.
    Loading,
    /// Restoration finished; this is the current record, if any.
    Ready(Option<&'a SessionRecord>),
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Decision deferred until auth restoration completes.
    Deferred,
    /// Render the requested page.
    Allowed,
    /// Render the blocking view; redirect when the countdown elapses.
    Blocked(BlockedRedirect),
}

/// The blocking view's countdown toward a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedRedirect {
    remaining_ticks: u8,
    target: Page,
    reason: DenyReason,
}

impl BlockedRedirect {
    fn new(target: Page, reason: DenyReason) -> Self {
        Self {
            remaining_ticks: REDIRECT_DELAY_TICKS,
            target,
            reason,
        }
    }

    /// Seconds left before the redirect fires.
    #[must_use]
    pub fn remaining_ticks(&self) -> u8 {
        self.remaining_ticks
    }

    /// Where the redirect will go.
    #[must_use]
    pub fn target(&self) -> Page {
        self.target
    }

    /// Why the page was denied.
    #[must_use]
    pub fn reason(&self) -> DenyReason {
        self.reason
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the redirect target once the countdown has elapsed; callers
    /// then navigate there. The countdown is not an access-control
    /// mechanism, only a delay before the redirect.
    pub fn tick(&mut self) -> Option<Page> {
        if self.remaining_ticks > 0 {
            self.remaining_ticks -= 1;
        }
        (self.remaining_ticks == 0).then_some(self.target)
    }
}

/// Gate between the router and the page views.
pub struct AccessGuard;

impl AccessGuard {
    /// Evaluates whether the identity behind `auth` may view `page`.
    #[must_use]
    pub fn evaluate(page: Page, auth: AuthProbe<'_>) -> GuardOutcome {
        Self::evaluate_at(page, auth, now_millis())
    }

    /// Evaluation at an explicit instant (epoch milliseconds).
    #[must_use]
    pub fn evaluate_at(page: Page, auth: AuthProbe<'_>, now_ms: i64) -> GuardOutcome {
        let session = match auth {
            AuthProbe::Loading => return GuardOutcome::Deferred,
            AuthProbe::Ready(session) => session,
        };
        match PageAccessPolicy::evaluate_at(page, session, now_ms) {
            AccessDecision::Allow => GuardOutcome::Allowed,
            AccessDecision::Deny(reason) => {
                // Any record, even an expired one, redirects to the
                // dashboard: the expiry modal owns that recovery path.
                let target = if session.is_some() {
                    Page::Dashboard
                } else {
                    Page::Landing
                };
                debug!(page = %page, ?reason, target = %target, "page blocked");
                GuardOutcome::Blocked(BlockedRedirect::new(target, reason))
            }
        }
    }
}
