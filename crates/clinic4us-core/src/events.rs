//! Session event broadcasting.
//!
//! The auth service is the single source of truth for the session; dependent
//! views subscribe here instead of being reloaded wholesale. A profile
//! switch in particular broadcasts [`SessionEvent::ProfileSwitched`] so
//! per-role view state can be invalidated without a full restart.

use crate::role::Role;
use tokio::sync::broadcast;

/// Default buffer size for the broadcast channel.
/// Slow receivers lag (and drop) rather than block the sender.
const DEFAULT_BUFFER_SIZE: usize = 64;

/// Lifecycle events emitted by the auth service.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A session was created by a successful login.
    LoggedIn { email: String, role: Role },

    /// The session was destroyed (explicit logout or discarded on restore).
    LoggedOut,

    /// The session was renewed; the countdown restarts at full duration.
    Renewed { email: String },

    /// The clinic/role context changed; cached per-role view state is stale.
    ProfileSwitched { clinic_name: String, role: Role },
}

/// Broadcaster for session lifecycle events.
///
/// Cloneable and shareable; every subscriber receives every event sent after
/// it subscribed.
#[derive(Clone)]
pub struct SessionEventBroadcaster {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBroadcaster {
    /// Create a new broadcaster with default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new broadcaster with custom buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it; 0 when nobody is
    /// listening, which is not an error.
    pub fn send(&self, event: SessionEvent) -> usize {
        self.sender.send(event).unwrap_or_default()
    }

    /// Send a "logged in" event.
    pub fn send_logged_in(&self, email: impl Into<String>, role: Role) -> usize {
        self.send(SessionEvent::LoggedIn {
            email: email.into(),
            role,
        })
    }

    /// Send a "logged out" event.
    pub fn send_logged_out(&self) -> usize {
        self.send(SessionEvent::LoggedOut)
    }

    /// Send a "renewed" event.
    pub fn send_renewed(&self, email: impl Into<String>) -> usize {
        self.send(SessionEvent::Renewed {
            email: email.into(),
        })
    }

    /// Send a "profile switched" event.
    pub fn send_profile_switched(&self, clinic_name: impl Into<String>, role: Role) -> usize {
        self.send(SessionEvent::ProfileSwitched {
            clinic_name: clinic_name.into(),
            role,
        })
    }

    /// Subscribe to events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionEventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEventBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
