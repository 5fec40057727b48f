use std::path::PathBuf;

use tracing::error;

use super::{AppContext, PageError, View};
use crate::models::Playlist;
use crate::navigation::PlaylistId;

pub const MISSING_IMPORT_ID: &str = "Please enter a playlist ID";
pub const IMPORTED: &str = "Playlist imported successfully";
pub const CONFIRM_DELETE: &str = "Delete this playlist? This cannot be undone.";

/// The signed-in user's playlist library.
pub struct DashboardPage<'a> {
    ctx: &'a AppContext,
    view: &'a dyn View,
}

impl<'a> DashboardPage<'a> {
    pub fn new(ctx: &'a AppContext, view: &'a dyn View) -> Self {
        Self { ctx, view }
    }

    pub async fn init(&self) -> Result<Vec<Playlist>, PageError> {
        self.load_playlists().await
    }

    /// Fetch the library and replace whatever list is rendered.
    pub async fn load_playlists(&self) -> Result<Vec<Playlist>, PageError> {
        self.view.show_loading();
        let result = self.ctx.gateway.list_mine().await;
        self.view.hide_loading();

        match result {
            Ok(playlists) => {
                self.view.render_playlists(&playlists);
                Ok(playlists)
            }
            Err(e) => {
                error!(error = %e, "Failed to load playlists");
                self.view.show_error(&e.message);
                Err(e.into())
            }
        }
    }

    /// Import a remote playlist by id, then reload the library.
    pub async fn import_playlist(&self, remote_id: &str) -> Result<(), PageError> {
        let remote_id = remote_id.trim();
        if remote_id.is_empty() {
            self.view.alert(MISSING_IMPORT_ID);
            return Err(PageError::Validation(MISSING_IMPORT_ID.to_string()));
        }

        if let Err(e) = self.ctx.gateway.import_from_remote(remote_id).await {
            error!(error = %e, remote_id, "Failed to import playlist");
            self.view.alert(&e.message);
            return Err(e.into());
        }

        self.view.alert(IMPORTED);
        self.load_playlists().await?;
        Ok(())
    }

    /// Ask for confirmation, then delete. Returns `Ok(false)` if declined.
    pub async fn request_delete(&self, id: PlaylistId) -> Result<bool, PageError> {
        if !self.view.confirm(CONFIRM_DELETE) {
            return Ok(false);
        }
        self.delete_playlist(id).await?;
        Ok(true)
    }

    /// Delete a playlist and, once that has settled, reload the library.
    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<(), PageError> {
        if let Err(e) = self.ctx.gateway.delete(id).await {
            error!(error = %e, id, "Failed to delete playlist");
            self.view.alert(&e.message);
            return Err(e.into());
        }
        self.load_playlists().await?;
        Ok(())
    }

    /// Export the whole library into the download directory.
    pub async fn export_all(&self) -> Result<PathBuf, PageError> {
        let file = match self.ctx.gateway.export_all().await {
            Ok(file) => file,
            Err(e) => {
                error!(error = %e, "Failed to export playlists");
                self.view.alert(&e.message);
                return Err(e.into());
            }
        };
        super::playlist_detail::save_export(self.ctx, self.view, &file)
    }
}
