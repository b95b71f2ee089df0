//! Authentication error types.
//!
//! Every variant here is recoverable and meant to be rendered inline; the
//! auth component has no fatal error path. Storage trouble is handled at the
//! store boundary and degrades to "no session" instead of surfacing here.

use clinic4us_core::Role;

/// Errors returned across the auth service boundary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Login failed: the email/password pair is not registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session renewal failed: the password does not match the current
    /// identity. The prior session record is left untouched.
    #[error("Invalid password")]
    InvalidPassword,

    /// Profile switch requested a role the current identity may not assume.
    #[error("Role {role} is not permitted for this account")]
    RoleNotPermitted {
        /// The role that was requested.
        role: Role,
    },

    /// The operation needs a current session and none exists.
    #[error("No active session")]
    NoActiveSession,

    /// The operation needs a session with time remaining; the current one
    /// ran out and must be renewed with a password first.
    #[error("Session expired")]
    SessionExpired,
}

impl AuthError {
    /// Creates a new `RoleNotPermitted` error.
    #[must_use]
    pub fn role_not_permitted(role: Role) -> Self {
        Self::RoleNotPermitted { role }
    }

    /// Message suitable for inline display next to the failed form.
    #[must_use]
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

/// Convenience result type for auth operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.display_message(),
            "Invalid email or password"
        );
        assert_eq!(AuthError::InvalidPassword.display_message(), "Invalid password");
        assert_eq!(
            AuthError::role_not_permitted(Role::Administrator).display_message(),
            "Role Administrator is not permitted for this account"
        );
        assert_eq!(AuthError::SessionExpired.display_message(), "Session expired");
    }
}
