//! The authentication state machine.
//!
//! Conceptually three states, all derived from the current record rather
//! than cached:
//!
//! - `Anonymous` — no record.
//! - `Authenticated` — record with time remaining.
//! - `Expired` — record with zero remaining; kept in memory so renewal can
//!   reuse the identity, but `is_authenticated` already reads false.
//!
//! Expiry is observed, not scheduled: any caller polling
//! [`AuthService::time_remaining`] discovers the transition.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, warn};

use clinic4us_core::{Page, Role, SessionEventBroadcaster, SessionRecord, clock};
use clinic4us_storage::SessionStore;

use crate::config::AuthConfig;
use crate::credentials::CredentialValidator;
use crate::error::{AuthError, AuthResult};

/// A login attempt.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,

    /// Login password. Consumed by validation, never stored.
    pub password: String,

    /// Whether to persist the remember-me flag.
    pub remember_me: bool,

    /// Clinic slug the login page was entered through, if any.
    pub clinic: Option<String>,
}

impl LoginRequest {
    /// Creates a request without a clinic slug.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: false,
            clinic: None,
        }
    }

    /// Sets the remember-me flag.
    #[must_use]
    pub fn remember(mut self, remember: bool) -> Self {
        self.remember_me = remember;
        self
    }

    /// Sets the clinic slug.
    #[must_use]
    pub fn with_clinic(mut self, clinic: impl Into<String>) -> Self {
        self.clinic = Some(clinic.into());
        self
    }
}

/// Where the client should go after logout: the login entry point of the
/// last known clinic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutRedirect {
    /// Clinic slug carried into the login URL.
    pub clinic: String,
}

impl LogoutRedirect {
    /// Relative login URL carrying the clinic slug.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("/?page={}&clinic={}", Page::Login.as_str(), self.clinic)
    }
}

/// Owner of the current session record and the authentication contract
/// exposed to the rest of the app.
pub struct AuthService {
    credentials: Arc<dyn CredentialValidator>,
    store: SessionStore,
    events: SessionEventBroadcaster,
    config: AuthConfig,
    current: ArcSwapOption<SessionRecord>,
}

impl AuthService {
    /// Creates the service and restores any persisted session.
    ///
    /// A restored record whose time already ran out is discarded from
    /// memory and from storage; the service then starts `Anonymous`.
    pub fn new(
        credentials: Arc<dyn CredentialValidator>,
        store: SessionStore,
        config: AuthConfig,
    ) -> Self {
        let service = Self {
            credentials,
            store,
            events: SessionEventBroadcaster::new(),
            config,
            current: ArcSwapOption::const_empty(),
        };
        service.restore();
        service
    }

    /// Re-reads the persisted session into memory.
    pub fn restore(&self) {
        match self.store.load() {
            Some(record) if clock::remaining(&record) > 0 => {
                debug!(email = %record.email, "restored persisted session");
                self.current.store(Some(Arc::new(record)));
            }
            Some(record) => {
                debug!(email = %record.email, "persisted session already expired; discarding");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to clear expired session");
                }
                self.current.store(None);
            }
            None => self.current.store(None),
        }
    }

    /// Attempts a login.
    ///
    /// On failure nothing changes: no record is created and storage is left
    /// untouched.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<SessionRecord> {
        let Some(credential) = self
            .credentials
            .validate(&request.email, &request.password)
            .await
        else {
            debug!(email = %request.email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let mut record = SessionRecord::new(
            credential.email.clone(),
            credential.display_name.clone(),
            request
                .clinic
                .clone()
                .unwrap_or_else(|| self.config.default_clinic_slug.clone()),
            credential.role,
            self.config.session_duration_secs(),
        );
        record.clinic = request.clinic;

        self.persist(&record);
        if let Err(e) = self.store.set_remember_me(request.remember_me) {
            warn!(error = %e, "failed to persist remember-me flag");
        }
        self.current.store(Some(Arc::new(record.clone())));
        self.events.send_logged_in(&record.email, record.role);
        debug!(email = %record.email, role = %record.role, "login succeeded");
        Ok(record)
    }

    /// Renews the current session with a fresh full duration.
    ///
    /// Valid from both the authenticated and the expired state. On a wrong
    /// password the prior record, including its timestamp, stays untouched.
    pub async fn renew_session(&self, password: &str) -> AuthResult<SessionRecord> {
        let Some(current) = self.current.load_full() else {
            return Err(AuthError::NoActiveSession);
        };
        if self
            .credentials
            .validate(&current.email, password)
            .await
            .is_none()
        {
            debug!(email = %current.email, "renewal rejected");
            return Err(AuthError::InvalidPassword);
        }

        let mut record = (*current).clone();
        record.refresh();
        self.persist(&record);
        self.current.store(Some(Arc::new(record.clone())));
        self.events.send_renewed(&record.email);
        debug!(email = %record.email, "session renewed");
        Ok(record)
    }

    /// Destroys the current session and clears storage.
    ///
    /// Idempotent: a second call leaves the same `Anonymous` end state and
    /// reports the default clinic entry point.
    pub fn logout(&self) -> LogoutRedirect {
        let previous = self.current.swap(None);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear persisted session on logout");
        }
        let clinic = previous
            .as_ref()
            .and_then(|r| r.clinic.clone())
            .unwrap_or_else(|| self.config.default_clinic_slug.clone());
        if previous.is_some() {
            self.events.send_logged_out();
            debug!("logged out");
        }
        LogoutRedirect { clinic }
    }

    /// Switches the clinic/role context of the authenticated identity.
    ///
    /// No password is required, but the requested role must be permitted
    /// for the current identity, and the session must still have time
    /// remaining: an expired session can only come back through
    /// [`AuthService::renew_session`]. The login timestamp is refreshed and
    /// a `ProfileSwitched` event invalidates dependent per-role view state.
    pub async fn update_profile(
        &self,
        clinic_name: impl Into<String>,
        role: Role,
        clinic: Option<String>,
    ) -> AuthResult<SessionRecord> {
        let Some(current) = self.current.load_full() else {
            return Err(AuthError::NoActiveSession);
        };
        if clock::remaining(&current) == 0 {
            debug!(email = %current.email, "profile switch rejected: session expired");
            return Err(AuthError::SessionExpired);
        }
        let Some(credential) = self.credentials.find_by_email(&current.email).await else {
            return Err(AuthError::InvalidCredentials);
        };
        if !credential.permits_role(role) {
            return Err(AuthError::role_not_permitted(role));
        }

        let mut record = (*current).clone();
        record.clinic_name = clinic_name.into();
        record.role = role;
        record.permissions = role
            .menu_pages()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        if clinic.is_some() {
            record.clinic = clinic;
        }
        record.refresh();

        self.persist(&record);
        self.current.store(Some(Arc::new(record.clone())));
        self.events
            .send_profile_switched(&record.clinic_name, record.role);
        debug!(clinic = %record.clinic_name, role = %record.role, "profile switched");
        Ok(record)
    }

    /// The current session record, present while authenticated or expired.
    #[must_use]
    pub fn user(&self) -> Option<Arc<SessionRecord>> {
        self.current.load_full()
    }

    /// Seconds left in the current session; 0 when anonymous or expired.
    #[must_use]
    pub fn time_remaining(&self) -> u64 {
        self.current
            .load()
            .as_ref()
            .map(|r| clock::remaining(r))
            .unwrap_or(0)
    }

    /// Recomputed on every call: a record exists and has time remaining.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.time_remaining() > 0
    }

    /// Subscribes to session lifecycle events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<clinic4us_core::SessionEvent> {
        self.events.subscribe()
    }

    // Storage failures never fail the operation; the in-memory session
    // remains the source of truth and the store keeps its previous value.
    fn persist(&self, record: &SessionRecord) {
        if let Err(e) = self.store.save(record) {
            warn!(error = %e, "failed to persist session record");
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::FixedCredentialStore;
    use clinic4us_core::SessionEvent;
    use clinic4us_storage::{KeyValueStorage, MemoryStorage, SESSION_KEY};
    use std::time::Duration;

    fn service() -> (Arc<MemoryStorage>, AuthService) {
        service_with_config(AuthConfig::default())
    }

    fn service_with_config(config: AuthConfig) -> (Arc<MemoryStorage>, AuthService) {
        let backend = Arc::new(MemoryStorage::new());
        let service = AuthService::new(
            Arc::new(FixedCredentialStore::with_demo_accounts()),
            SessionStore::new(backend.clone()),
            config,
        );
        (backend, service)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (backend, service) = service();
        let record = service
            .login(LoginRequest::new("admin@clinic4us.com", "123456").remember(true))
            .await
            .unwrap();

        assert_eq!(record.role, Role::Administrator);
        assert!(service.is_authenticated());
        let remaining = service.time_remaining();
        assert!(remaining > 3595 && remaining <= 3600, "remaining={remaining}");
        assert!(backend.get(SESSION_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (backend, service) = service();
        let err = service
            .login(LoginRequest::new("admin@clinic4us.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(service.user().is_none());
        assert!(!service.is_authenticated());
        assert!(backend.is_empty(), "storage must be untouched on failure");
    }

    #[tokio::test]
    async fn test_renew_resets_duration_and_preserves_identity() {
        let (_backend, service) = service();
        let before = service
            .login(LoginRequest::new("dra.ana@clinic4us.com", "123456"))
            .await
            .unwrap();

        let renewed = service.renew_session("123456").await.unwrap();
        assert_eq!(renewed.email, before.email);
        assert_eq!(renewed.role, before.role);
        assert!(renewed.login_timestamp >= before.login_timestamp);
        assert_eq!(service.time_remaining(), renewed.session_duration);
    }

    #[tokio::test]
    async fn test_renew_wrong_password_leaves_record_untouched() {
        let (_backend, service) = service();
        let before = service
            .login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();

        let err = service.renew_session("wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidPassword);

        let current = service.user().unwrap();
        assert_eq!(current.login_timestamp, before.login_timestamp);
    }

    #[tokio::test]
    async fn test_renew_without_session() {
        let (_backend, service) = service();
        assert_eq!(
            service.renew_session("123456").await.unwrap_err(),
            AuthError::NoActiveSession
        );
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (backend, service) = service();
        service
            .login(LoginRequest::new("admin@clinic4us.com", "123456").with_clinic("vila-mariana"))
            .await
            .unwrap();

        let first = service.logout();
        assert_eq!(first.clinic, "vila-mariana");
        assert_eq!(first.login_url(), "/?page=login&clinic=vila-mariana");
        assert!(service.user().is_none());
        assert!(backend.is_empty());

        let second = service.logout();
        assert_eq!(second.clinic, "clinic4us");
        assert!(service.user().is_none());
    }

    #[tokio::test]
    async fn test_logout_falls_back_to_default_clinic() {
        let (_backend, service) = service();
        service
            .login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();
        assert_eq!(service.logout().clinic, "clinic4us");
    }

    #[tokio::test]
    async fn test_update_profile_switches_role_and_permissions() {
        let (_backend, service) = service();
        service
            .login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();
        let mut events = service.subscribe();

        let record = service
            .update_profile("Clínica Vila Mariana", Role::Professional, Some("vila".into()))
            .await
            .unwrap();

        assert_eq!(record.role, Role::Professional);
        assert_eq!(record.clinic_name, "Clínica Vila Mariana");
        assert!(record.permits(Page::TherapyPlans));
        assert!(!record.permits(Page::AdminPlans));
        assert!(service.is_authenticated());

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::ProfileSwitched {
                clinic_name: "Clínica Vila Mariana".to_string(),
                role: Role::Professional,
            }
        );
    }

    #[tokio::test]
    async fn test_update_profile_rejects_unpermitted_role() {
        let (_backend, service) = service();
        service
            .login(LoginRequest::new("recepcao@clinic4us.com", "123456"))
            .await
            .unwrap();

        let err = service
            .update_profile("Clinic4US", Role::Administrator, None)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::role_not_permitted(Role::Administrator));

        // The session is untouched.
        assert_eq!(service.user().unwrap().role, Role::Secretary);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_expired_session() {
        let (_backend, service) = service_with_config(
            AuthConfig::default().with_session_duration(Duration::from_secs(1)),
        );
        let before = service
            .login(LoginRequest::new("dra.ana@clinic4us.com", "123456"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!service.is_authenticated());

        // Even the identity's own role must not slip through: the only way
        // back from expired is a password renewal.
        let err = service
            .update_profile("Clinic4US", Role::Professional, None)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::SessionExpired);
        assert!(!service.is_authenticated());
        assert_eq!(service.time_remaining(), 0);
        assert_eq!(service.user().unwrap().login_timestamp, before.login_timestamp);

        // Renewal still works afterwards.
        service.renew_session("123456").await.unwrap();
        assert!(service.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_valid_session() {
        let backend = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(backend.clone());
        let record = SessionRecord::new(
            "admin@clinic4us.com",
            "Admin",
            "Clinic4US",
            Role::Administrator,
            3600,
        );
        store.save(&record).unwrap();

        let service = AuthService::new(
            Arc::new(FixedCredentialStore::with_demo_accounts()),
            store,
            AuthConfig::default(),
        );
        assert!(service.is_authenticated());
        assert_eq!(service.user().unwrap().email, "admin@clinic4us.com");
    }

    #[tokio::test]
    async fn test_restore_discards_expired_session() {
        let backend = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(backend.clone());
        let mut record = SessionRecord::new(
            "admin@clinic4us.com",
            "Admin",
            "Clinic4US",
            Role::Administrator,
            3600,
        );
        record.login_timestamp -= 4000 * 1000;
        store.save(&record).unwrap();

        let service = AuthService::new(
            Arc::new(FixedCredentialStore::with_demo_accounts()),
            store,
            AuthConfig::default(),
        );
        assert!(!service.is_authenticated());
        assert!(service.user().is_none());
        assert!(backend.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_recovers_from_corrupt_storage() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set(SESSION_KEY, "garbage").unwrap();

        let service = AuthService::new(
            Arc::new(FixedCredentialStore::with_demo_accounts()),
            SessionStore::new(backend.clone()),
            AuthConfig::default(),
        );
        assert!(!service.is_authenticated());
        assert!(backend.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_passive_expiry_then_renewal() {
        let (_backend, service) = service_with_config(
            AuthConfig::default().with_session_duration(Duration::from_secs(1)),
        );
        service
            .login(LoginRequest::new("admin@clinic4us.com", "123456"))
            .await
            .unwrap();
        assert!(service.is_authenticated());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        // Expired without an explicit logout: unauthenticated, record kept.
        assert!(!service.is_authenticated());
        assert_eq!(service.time_remaining(), 0);
        assert!(service.user().is_some());

        let renewed = service.renew_session("123456").await.unwrap();
        assert!(service.is_authenticated());
        assert_eq!(service.time_remaining(), renewed.session_duration);
    }
}
