//! Logical pages of the clinic application.
//!
//! The URL is the source of truth for navigation: a single `page` query
//! parameter selects the logical page. Unknown or missing values fall back
//! to the public landing page so malformed URLs fail closed instead of
//! misrouting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical page identifiers recognized by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Page {
    Landing,
    Login,
    Dashboard,
    PatientRegistration,
    Schedule,
    TherapyPlans,
    AdminPlans,
    AdminProfiles,
    AdminFaq,
    PatientReportPrint,
    EvolutionReportPrint,
}

impl Page {
    /// Value used in the `page` query parameter and in permission sets.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::PatientRegistration => "patient-registration",
            Self::Schedule => "schedule",
            Self::TherapyPlans => "therapy-plans",
            Self::AdminPlans => "admin-plans",
            Self::AdminProfiles => "admin-profiles",
            Self::AdminFaq => "admin-faq",
            Self::PatientReportPrint => "patient-report-print",
            Self::EvolutionReportPrint => "evolution-report-print",
        }
    }

    /// Parses a `page` query parameter value.
    ///
    /// Unknown and absent values resolve to [`Page::Landing`].
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("landing") => Self::Landing,
            Some("login") => Self::Login,
            Some("dashboard") => Self::Dashboard,
            Some("patient-registration") => Self::PatientRegistration,
            Some("schedule") => Self::Schedule,
            Some("therapy-plans") => Self::TherapyPlans,
            Some("admin-plans") => Self::AdminPlans,
            Some("admin-profiles") => Self::AdminProfiles,
            Some("admin-faq") => Self::AdminFaq,
            Some("patient-report-print") => Self::PatientReportPrint,
            Some("evolution-report-print") => Self::EvolutionReportPrint,
            _ => Self::Landing,
        }
    }

    /// Returns `true` if the page is reachable without a session.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Landing | Self::Login)
    }

    /// Returns `true` for the printable clinical report pages, which are
    /// gated on role rather than on the session's menu permissions.
    #[must_use]
    pub fn requires_clinical_role(&self) -> bool {
        matches!(self, Self::PatientReportPrint | Self::EvolutionReportPrint)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Page> for String {
    fn from(page: Page) -> Self {
        page.as_str().to_string()
    }
}

impl TryFrom<String> for Page {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let page = Page::from_param(Some(value.as_str()));
        if page.as_str() == value {
            Ok(page)
        } else {
            Err(format!("unknown page identifier: {value}"))
        }
    }
}
