//! Typed navigation targets and the `Navigator` seam.
//!
//! Controllers never move between pages themselves; they ask a `Navigator`,
//! and the front end decides what "going to /dashboard" means.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

pub type PlaylistId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Search,
    PlaylistDetail(PlaylistId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Search => "/search".to_string(),
            Route::PlaylistDetail(id) => format!("/playlist-detail?id={}", id),
        }
    }

    /// Parse a path produced by [`Route::path`].
    pub fn parse(path: &str) -> Option<Self> {
        let (base, query) = match path.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (path, None),
        };
        match base {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            "/search" => Some(Route::Search),
            "/playlist-detail" => query?
                .split('&')
                .find_map(|pair| pair.strip_prefix("id="))
                .and_then(|id| id.parse().ok())
                .map(Route::PlaylistDetail),
            _ => None,
        }
    }

    /// Pages reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every request; the front end follows the last one.
#[derive(Debug, Default)]
pub struct NavigationLog {
    history: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn history(&self) -> MutexGuard<'_, Vec<Route>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Most recent navigation target, if any.
    pub fn current(&self) -> Option<Route> {
        self.history().last().copied()
    }

    /// Take the most recent target and forget the rest.
    pub fn take_pending(&self) -> Option<Route> {
        let mut history = self.history();
        let last = history.last().copied();
        history.clear();
        last
    }

    pub fn visited(&self) -> Vec<Route> {
        self.history().clone()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        debug!(target_path = %route, "Navigate");
        self.history().push(route);
    }
}
