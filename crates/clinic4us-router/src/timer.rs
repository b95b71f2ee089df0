//! The 1-second session countdown.
//!
//! One cancellable interval per timer. Each tick re-reads the remaining
//! time from the auth service (absolute arithmetic, no drift) and
//! broadcasts it for display. When the countdown reaches zero the timer
//! emits exactly one `Expired` update and stops itself; it only ticks again
//! after an explicit restart following a successful renewal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clinic4us_auth::AuthService;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Formats remaining seconds as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Updates emitted on the timer's cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUpdate {
    /// Seconds remaining; emitted once per second while authenticated.
    Tick(u64),
    /// The session ran out. Emitted exactly once per expiry.
    Expired,
}

/// The countdown driver behind the header's session timer view.
pub struct SessionTimer {
    auth: Arc<AuthService>,
    updates: broadcast::Sender<TimerUpdate>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTimer {
    /// Creates a stopped timer over the auth service.
    #[must_use]
    pub fn new(auth: Arc<AuthService>) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self {
            auth,
            updates,
            task: Mutex::new(None),
        }
    }

    /// Subscribes to timer updates.
    pub fn subscribe(&self) -> broadcast::Receiver<TimerUpdate> {
        self.updates.subscribe()
    }

    /// Starts the 1 Hz cadence, cancelling any previous one first.
    ///
    /// The cadence stops on its own when the session disappears (logout)
    /// or expires; restart after a successful renewal.
    pub fn start(&self) {
        self.stop();
        let auth = Arc::clone(&self.auth);
        let updates = self.updates.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if auth.user().is_none() {
                    debug!("session gone; timer stopping");
                    break;
                }
                let remaining = auth.time_remaining();
                if remaining == 0 {
                    debug!("session expired; timer firing once and stopping");
                    let _ = updates.send(TimerUpdate::Expired);
                    break;
                }
                let _ = updates.send(TimerUpdate::Tick(remaining));
            }
        });
        *self.task.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
    }

    /// Cancels the cadence if one is running.
    pub fn stop(&self) {
        if let Some(handle) = self
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }

    /// Returns `true` while the cadence task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic4us_auth::{AuthConfig, FixedCredentialStore, LoginRequest};
    use clinic4us_storage::{MemoryStorage, SessionStore};

    fn auth_with_duration(secs: u64) -> Arc<AuthService> {
        Arc::new(AuthService::new(
            Arc::new(FixedCredentialStore::with_demo_accounts()),
            SessionStore::new(Arc::new(MemoryStorage::new())),
            AuthConfig::default().with_session_duration(Duration::from_secs(secs)),
        ))
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(60), "00:01:00");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(86399), "23:59:59");
    }

    #[tokio::test]
    async fn test_ticks_while_authenticated() {
        let auth = auth_with_duration(3600);
        auth.login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();

        let timer = SessionTimer::new(auth);
        let mut updates = timer.subscribe();
        timer.start();

        let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
            .await
            .expect("tick in time")
            .unwrap();
        match update {
            TimerUpdate::Tick(remaining) => assert!(remaining > 3595),
            TimerUpdate::Expired => panic!("fresh session must not expire"),
        }
        timer.stop();
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_expiry_fires_exactly_once() {
        let auth = auth_with_duration(1);
        auth.login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();

        let timer = SessionTimer::new(auth);
        let mut updates = timer.subscribe();
        timer.start();

        let mut expired = 0;
        loop {
            match tokio::time::timeout(Duration::from_secs(3), updates.recv()).await {
                Ok(Ok(TimerUpdate::Expired)) => expired += 1,
                Ok(Ok(TimerUpdate::Tick(_))) => continue,
                // Channel closed or quiet: the cadence has stopped.
                _ => break,
            }
        }
        assert_eq!(expired, 1);
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_stops_after_logout() {
        let auth = auth_with_duration(3600);
        auth.login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();

        let timer = SessionTimer::new(auth.clone());
        timer.start();
        auth.logout();

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_restart_cancels_previous_cadence() {
        let auth = auth_with_duration(3600);
        auth.login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();

        let timer = SessionTimer::new(auth);
        timer.start();
        timer.start();
        assert!(timer.is_running());
        timer.stop();
        assert!(!timer.is_running());
    }
}
