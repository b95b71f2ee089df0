//! The expired-session recovery modal.
//!
//! Opens when the timer fires its expiry update and offers exactly two
//! actions: renew with the password, or log out. A failed renewal keeps the
//! modal open with the typed failure message so the user never lands on an
//! undefined screen.

use clinic4us_auth::{AuthResult, AuthService, LogoutRedirect};
use clinic4us_core::SessionRecord;

/// Visible state of the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    /// Not shown.
    Closed,
    /// Shown, with the last renewal failure message, if any.
    Open { error: Option<String> },
}

/// State machine behind the expired-session dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryModal {
    state: ModalState,
}

impl ExpiryModal {
    /// Creates a closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    /// Opens the modal (expiry fired).
    pub fn open(&mut self) {
        if self.state == ModalState::Closed {
            self.state = ModalState::Open { error: None };
        }
    }

    /// Returns `true` while the modal is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    /// The last renewal failure message, if the modal is open with one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open { error } => error.as_deref(),
            ModalState::Closed => None,
        }
    }

    /// Attempts renewal with the given password.
    ///
    /// Success dismisses the modal; the caller restarts the countdown.
    /// Failure keeps it open and records the message for display.
    pub async fn renew(
        &mut self,
        auth: &AuthService,
        password: &str,
    ) -> AuthResult<SessionRecord> {
        match auth.renew_session(password).await {
            Ok(record) => {
                self.state = ModalState::Closed;
                Ok(record)
            }
            Err(e) => {
                self.state = ModalState::Open {
                    error: Some(e.display_message()),
                };
                Err(e)
            }
        }
    }

    /// Logs out and dismisses the modal unconditionally.
    pub fn logout(&mut self, auth: &AuthService) -> LogoutRedirect {
        self.state = ModalState::Closed;
        auth.logout()
    }
}

impl Default for ExpiryModal {
    fn default() -> Self {
        Self::new()
    }
}
