//! Development reload hook, invoked by the router before each request

use super::repository::Repository;

/// What a request is about to hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// A static asset (stylesheets, images)
    Static,
    /// A registered view rendering pages or posts
    View,
    /// Anything the router does not know (e.g. a favicon probe)
    Unknown,
}

/// Reloads content before view requests while developing
#[derive(Debug, Clone, Copy)]
pub struct ReloadHook {
    enabled: bool,
}

impl ReloadHook {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reload the repository if this request warrants it.
    ///
    /// Returns whether a reload was attempted. A failed reload is logged by
    /// the repository and the previous content keeps serving.
    pub fn before_request(&self, repository: &Repository, endpoint: Endpoint) -> bool {
        if !self.enabled || endpoint != Endpoint::View {
            return false;
        }

        if let Err(e) = repository.load() {
            tracing::warn!("Serving stale content after reload failure: {}", e);
        }
        true
    }
}
