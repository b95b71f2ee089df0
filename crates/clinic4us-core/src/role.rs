//! User roles within a clinic.

use crate::error::CoreError;
use crate::page::Page;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role an authenticated identity holds within the current clinic context.
///
/// The role decides which menu pages a session is granted and whether the
/// clinical print pages are reachable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Professional,
    Secretary,
}

impl Role {
    /// Canonical wire name for the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Professional => "Professional",
            Self::Secretary => "Secretary",
        }
    }

    /// Returns `true` if this role may open the clinical print pages.
    #[must_use]
    pub fn is_clinical(&self) -> bool {
        matches!(self, Self::Administrator | Self::Professional)
    }

    /// Menu pages granted to a fresh session under this role.
    ///
    /// This is the permitted-page set written into the session record at
    /// login and after a profile switch.
    #[must_use]
    pub fn menu_pages(&self) -> &'static [Page] {
        match self {
            Self::Administrator => &[
                Page::Dashboard,
                Page::PatientRegistration,
                Page::Schedule,
                Page::TherapyPlans,
                Page::AdminPlans,
                Page::AdminProfiles,
                Page::AdminFaq,
                Page::PatientReportPrint,
                Page::EvolutionReportPrint,
            ],
            Self::Professional => &[
                Page::Dashboard,
                Page::PatientRegistration,
                Page::Schedule,
                Page::TherapyPlans,
                Page::PatientReportPrint,
                Page::EvolutionReportPrint,
            ],
            Self::Secretary => &[Page::Dashboard, Page::PatientRegistration, Page::Schedule],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrator" => Ok(Self::Administrator),
            "Professional" => Ok(Self::Professional),
            "Secretary" => Ok(Self::Secretary),
            other => Err(CoreError::invalid_role(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Administrator, Role::Professional, Role::Secretary] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_from_str_invalid() {
        assert!(Role::from_str("administrator").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_role_serde_uses_variant_name() {
        let json = serde_json::to_string(&Role::Professional).unwrap();
        assert_eq!(json, "\"Professional\"");
        let role: Role = serde_json::from_str("\"Secretary\"").unwrap();
        assert_eq!(role, Role::Secretary);
    }

    #[test]
    fn test_clinical_roles() {
        assert!(Role::Administrator.is_clinical());
        assert!(Role::Professional.is_clinical());
        assert!(!Role::Secretary.is_clinical());
    }

    #[test]
    fn test_menu_pages_exclude_public() {
        for role in [Role::Administrator, Role::Professional, Role::Secretary] {
            assert!(role.menu_pages().iter().all(|p| !p.is_public()));
        }
    }

    #[test]
    fn test_secretary_has_no_admin_screens() {
        let pages = Role::Secretary.menu_pages();
        assert!(!pages.contains(&Page::AdminPlans));
        assert!(!pages.contains(&Page::AdminProfiles));
        assert!(!pages.contains(&Page::AdminFaq));
    }
}
