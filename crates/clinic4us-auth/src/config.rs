//! Auth configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! session_duration = "1h"
//! default_clinic_slug = "clinic4us"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the auth service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a session lives after login or renewal.
    #[serde(with = "humantime_serde")]
    pub session_duration: Duration,

    /// Clinic slug used for the logout redirect when the session carries no
    /// clinic identifier of its own.
    pub default_clinic_slug: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::from_secs(3600), // 1 hour
            default_clinic_slug: "clinic4us".to_string(),
        }
    }
}

impl AuthConfig {
    /// Parses the configuration from a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Document {
            auth: AuthConfig,
        }
        toml::from_str::<Document>(content).map(|d| d.auth)
    }

    /// Session duration in whole seconds.
    #[must_use]
    pub fn session_duration_secs(&self) -> u64 {
        self.session_duration.as_secs()
    }

    /// Overrides the session duration.
    #[must_use]
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_duration_secs(), 3600);
        assert_eq!(config.default_clinic_slug, "clinic4us");
    }

    #[test]
    fn test_from_toml() {
        let config = AuthConfig::from_toml(
            r#"
            [auth]
            session_duration = "30m"
            default_clinic_slug = "downtown"
            "#,
        )
        .unwrap();
        assert_eq!(config.session_duration_secs(), 1800);
        assert_eq!(config.default_clinic_slug, "downtown");
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = AuthConfig::from_toml("").unwrap();
        assert_eq!(config.session_duration_secs(), 3600);
    }
}
