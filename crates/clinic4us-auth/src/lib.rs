//! Authentication and session lifecycle for the Clinic4US client.
//!
//! [`AuthService`] is the single source of truth for the current session.
//! It orchestrates login, logout, renewal, and clinic/profile switching on
//! top of a [`CredentialValidator`] and the persisted
//! [`clinic4us_storage::SessionStore`], and broadcasts
//! [`clinic4us_core::SessionEvent`]s so dependent views can invalidate
//! themselves instead of being reloaded.

pub mod config;
pub mod credentials;
pub mod error;
pub mod service;

pub use config::AuthConfig;
pub use credentials::{Credential, CredentialValidator, FixedCredentialStore};
pub use error::{AuthError, AuthResult};
pub use service::{AuthService, LoginRequest, LogoutRedirect};
