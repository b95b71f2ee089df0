//! Credential validation.
//!
//! The validator is a seam: the fixed in-memory table below stands in for a
//! real identity provider, and the auth service only depends on the
//! validate/lookup contract so the two are swappable.

use async_trait::async_trait;
use clinic4us_core::Role;

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Login email, compared case-insensitively.
    pub email: String,

    /// Login password. Lives only in this table; never persisted.
    pub password: String,

    /// Role registered for the identity.
    pub role: Role,

    /// Name shown in the header after login.
    pub display_name: String,
}

impl Credential {
    /// Creates a credential entry.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
            display_name: display_name.into(),
        }
    }

    /// Whether this identity may assume the given role during a profile
    /// switch. Administrators may assume any clinic profile; everyone else
    /// only their registered role.
    #[must_use]
    pub fn permits_role(&self, role: Role) -> bool {
        self.role == Role::Administrator || self.role == role
    }
}

/// Validation seam over the registered identities.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Checks an email/password pair; `None` means invalid.
    async fn validate(&self, email: &str, password: &str) -> Option<Credential>;

    /// Looks up an identity by email regardless of password.
    /// Used for renewal and profile-switch checks against the current
    /// identity.
    async fn find_by_email(&self, email: &str) -> Option<Credential>;
}

/// Fixed in-memory credential table.
#[derive(Debug, Default)]
pub struct FixedCredentialStore {
    entries: Vec<Credential>,
}

impl FixedCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from the given entries.
    #[must_use]
    pub fn with_entries(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// Demo accounts used by the mocked client build.
    #[must_use]
    pub fn with_demo_accounts() -> Self {
        Self::with_entries(vec![
            Credential::new(
                "admin@clinic4us.com",
                "123456",
                Role::Administrator,
                "Admin",
            ),
            Credential::new(
                "dra.ana@clinic4us.com",
                "123456",
                Role::Professional,
                "Dra. Ana Souza",
            ),
            Credential::new(
                "recepcao@clinic4us.com",
                "123456",
                Role::Secretary,
                "Recepção",
            ),
        ])
    }

    fn lookup(&self, email: &str) -> Option<&Credential> {
        self.entries
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email))
    }
}

#[async_trait]
impl CredentialValidator for FixedCredentialStore {
    async fn validate(&self, email: &str, password: &str) -> Option<Credential> {
        self.lookup(email)
            .filter(|c| c.password == password)
            .cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<Credential> {
        self.lookup(email).cloned()
    }
}
