// Router - hash navigation, legacy-link interception, and the ordering
// guard for in-flight fragment loads
//
// Loads are fire-and-forget: nothing is cancelled and nothing times out,
// so two rapid navigations can complete out of order. Each load gets a
// monotonic sequence number and only the newest one is allowed to swap;
// older completions are discarded on arrival.

use crate::routes::{self, ROOT_HASH};

/// Suffix that marks an anchor as a legacy page link
const LEGACY_SUFFIX: &str = ".html";

/// Legacy page-name substrings and the hashes they map to, in match
/// priority order
const LEGACY_PAGES: &[(&str, &str)] = &[
    ("cadastro", "#/cadastro"),
    ("projeto", "#/projeto"),
    ("index", ROOT_HASH),
];

/// Translate a clicked anchor's href into a hash route.
///
/// Only hrefs ending in the legacy page suffix are intercepted; everything
/// else returns None and the click proceeds untouched. An intercepted href
/// maps by case-sensitive substring match, falling back to the root hash
/// when no known page name appears anywhere in it.
pub fn intercept_link(href: &str) -> Option<&'static str> {
    if !href.ends_with(LEGACY_SUFFIX) {
        return None;
    }
    let hash = LEGACY_PAGES
        .iter()
        .find(|(page, _)| href.contains(page))
        .map(|(_, hash)| *hash)
        .unwrap_or(ROOT_HASH);
    Some(hash)
}

/// One pending navigation: where to fetch from and its place in the order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub seq: u64,
    pub url: String,
}

/// Owns the route table lookup and the load-ordering state.
///
/// The engine is the single caller, so no synchronization is needed: every
/// sequence number is allocated and checked on the engine's thread, and
/// the fetch tasks only carry their number back.
pub struct Router {
    base_url: String,
    /// Sequence of the newest load started so far; 0 means none yet
    latest: u64,
}

impl Router {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            latest: 0,
        }
    }

    /// Begin a navigation to `hash`: resolve it through the route table
    /// (unknown hashes land on the root entry) and claim the next sequence
    /// number.
    pub fn begin(&mut self, hash: &str) -> Navigation {
        let resource = routes::resolve(hash);
        self.latest += 1;
        tracing::debug!(seq = self.latest, hash, resource, "navigation started");
        Navigation {
            seq: self.latest,
            url: format!("{}/{}", self.base_url.trim_end_matches('/'), resource),
        }
    }

    /// Whether a completed load is still the newest one. Completions that
    /// lost the race are dropped so a stale fragment can never overwrite a
    /// newer one.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}
