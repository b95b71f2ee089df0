//! URL-driven navigation, page access control, and the session countdown.
//!
//! The URL is authoritative: [`Router`] derives [`NavigationState`] from it
//! on every navigation and on every back/forward gesture. [`AccessGuard`]
//! decides whether the authenticated identity may view the derived page,
//! and [`SessionTimer`] drives the 1-second countdown that discovers
//! session expiry.

pub mod guard;
pub mod modal;
pub mod nav;
pub mod policy;
pub mod timer;

pub use guard::{AccessGuard, AuthProbe, BlockedRedirect, GuardOutcome, REDIRECT_DELAY_TICKS};
pub use modal::{ExpiryModal, ModalState};
pub use nav::{NavigationState, Router};
pub use policy::{AccessDecision, DenyReason, PageAccessPolicy};
pub use timer::{SessionTimer, TimerUpdate, format_hms};
