//! Navigation state derived from the URL.
//!
//! A single `page` query parameter selects the logical page; every other
//! parameter is page-specific (a patient id, a clinic slug). Navigation
//! rewrites the URL without a reload, and browser back/forward is honored
//! by re-deriving state from the URL it lands on.

use clinic4us_core::Page;
use indexmap::IndexMap;
use tracing::debug;
use url::Url;

/// Query parameter that names the logical page.
const PAGE_PARAM: &str = "page";

/// Cached view of the current URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Logical page the URL selects; unknown values read as the landing page.
    pub page: Page,

    /// Page-specific query parameters, in URL order, excluding `page`.
    pub params: IndexMap<String, String>,
}

impl NavigationState {
    /// Derives the state from a URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut page_value = None;
        let mut params = IndexMap::new();
        for (key, value) in url.query_pairs() {
            if key == PAGE_PARAM {
                page_value = Some(value.into_owned());
            } else {
                params.insert(key.into_owned(), value.into_owned());
            }
        }
        Self {
            page: Page::from_param(page_value.as_deref()),
            params,
        }
    }
}

/// Owner of the current URL and the navigation operations over it.
#[derive(Debug, Clone)]
pub struct Router {
    current: Url,
}

impl Router {
    /// Creates a router positioned at the given URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { current: url }
    }

    /// Parses the starting URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(input)?))
    }

    /// The URL the router currently points at.
    #[must_use]
    pub fn current_url(&self) -> &Url {
        &self.current
    }

    /// Navigation state re-derived from the current URL.
    #[must_use]
    pub fn state(&self) -> NavigationState {
        NavigationState::from_url(&self.current)
    }

    /// The logical page the current URL selects.
    #[must_use]
    pub fn page(&self) -> Page {
        self.state().page
    }

    /// Reads one page-specific query parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<String> {
        self.state().params.get(key).cloned()
    }

    /// All page-specific query parameters.
    #[must_use]
    pub fn params(&self) -> IndexMap<String, String> {
        self.state().params
    }

    /// Navigates to a page, rewriting the URL without a reload.
    ///
    /// Explicit `params` win; existing parameters not superseded are
    /// preserved. Returns the rewritten URL for the host to push into
    /// history.
    pub fn navigate_to(&mut self, page: Page, params: &[(&str, &str)]) -> &Url {
        let mut merged = self.state().params;
        for (key, value) in params {
            merged.insert((*key).to_string(), (*value).to_string());
        }

        {
            let mut pairs = self.current.query_pairs_mut();
            pairs.clear();
            pairs.append_pair(PAGE_PARAM, page.as_str());
            for (key, value) in &merged {
                pairs.append_pair(key, value);
            }
        }
        debug!(page = %page, url = %self.current, "navigated");
        &self.current
    }

    /// Re-derives state from a URL the browser landed on (back/forward).
    pub fn sync_from_url(&mut self, url: Url) {
        debug!(url = %url, "history navigation");
        self.current = url;
    }
}
