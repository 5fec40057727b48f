//! Page controllers.
//!
//! Each controller is a thin adapter: validate input, call the gateway,
//! render the result or the error through a [`View`]. Controllers never
//! retry and never swallow errors; every failure is shown and returned.
//!
//! - `gate`: the auth check every page runs on load
//! - `login`, `register`: the sign-in forms
//! - `dashboard`: the user's playlists, import and delete
//! - `search`: remote playlist search and import
//! - `playlist_detail`: one playlist, its songs, and export

pub mod dashboard;
pub mod gate;
pub mod login;
pub mod playlist_detail;
pub mod register;
pub mod search;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;

use crate::api::ApiGateway;
use crate::auth::{FileStorage, SessionStore, Storage, UnauthorizedGuard};
use crate::config::Config;
use crate::models::{Playlist, RemotePlaylist, Song};
use crate::navigation::Navigator;
use crate::ApiError;

pub use dashboard::DashboardPage;
pub use gate::init_page;
pub use login::LoginPage;
pub use playlist_detail::PlaylistDetailPage;
pub use register::RegisterPage;
pub use search::SearchPage;

/// Rendering interface for the pages.
///
/// Only the error, alert and confirm channels are required; page-specific
/// renderers default to doing nothing so a view can implement just the
/// pages it shows.
pub trait View: Send + Sync {
    /// Write `message` into the page's error area.
    fn show_error(&self, message: &str);

    /// Modal notice the user must acknowledge.
    fn alert(&self, message: &str);

    /// Ask a yes/no question before a destructive action.
    fn confirm(&self, prompt: &str) -> bool;

    fn show_loading(&self) {}

    fn hide_loading(&self) {}

    fn show_username(&self, _name: &str) {}

    fn render_playlists(&self, _playlists: &[Playlist]) {}

    fn render_search_results(&self, _results: &[RemotePlaylist]) {}

    fn render_playlist_info(&self, _playlist: &Playlist) {}

    fn render_songs(&self, _songs: &[Song]) {}
}

/// Why a page action did not complete. The message has already been shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A local side effect (session write, file save) failed.
    #[error("{0}")]
    Local(String),
}

/// The services a page needs, built once per application run.
#[derive(Clone)]
pub struct AppContext {
    pub session: SessionStore,
    pub gateway: Arc<ApiGateway>,
    pub navigator: Arc<dyn Navigator>,
    pub download_dir: PathBuf,
}

impl AppContext {
    /// Wire the services together and register the 401 guard on the gateway.
    pub fn new(
        storage: Arc<dyn Storage>,
        gateway: ApiGateway,
        navigator: Arc<dyn Navigator>,
        download_dir: PathBuf,
    ) -> Self {
        let session = SessionStore::new(storage);
        let gateway = Arc::new(gateway);
        gateway.add_error_handler(Arc::new(UnauthorizedGuard::new(
            session.clone(),
            navigator.clone(),
        )));
        Self {
            session,
            gateway,
            navigator,
            download_dir,
        }
    }

    /// Build a context from on-disk configuration and the file-backed session.
    pub fn from_config(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let storage = FileStorage::open(config.cache_dir()?)?;
        let gateway = ApiGateway::new(config.gateway_settings())?;
        Ok(Self::new(
            Arc::new(storage),
            gateway,
            navigator,
            config.download_dir(),
        ))
    }

    /// Sign out: drop the token everywhere and go to the login page.
    pub fn logout(&self) -> Result<()> {
        self.session.logout(&self.gateway, self.navigator.as_ref())
    }
}
