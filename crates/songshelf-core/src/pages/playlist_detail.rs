use std::path::PathBuf;

use futures::future;
use tracing::{error, info};

use super::{AppContext, PageError, View};
use crate::models::{ExportedFile, Playlist, Song};
use crate::navigation::PlaylistId;

pub const INVALID_PLAYLIST_ID: &str = "Invalid playlist ID";

/// One playlist with its songs.
pub struct PlaylistDetailPage<'a> {
    ctx: &'a AppContext,
    view: &'a dyn View,
}

impl<'a> PlaylistDetailPage<'a> {
    pub fn new(ctx: &'a AppContext, view: &'a dyn View) -> Self {
        Self { ctx, view }
    }

    /// Parse the raw `id` query value.
    pub fn parse_id(raw: Option<&str>) -> Option<PlaylistId> {
        raw.map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| id.parse().ok())
    }

    /// Load the page for the raw `id` query value.
    ///
    /// Detail and songs are requested together; each renders independently.
    pub async fn init(&self, raw_id: Option<&str>) -> Result<(Playlist, Vec<Song>), PageError> {
        let Some(id) = Self::parse_id(raw_id) else {
            self.view.show_error(INVALID_PLAYLIST_ID);
            return Err(PageError::Validation(INVALID_PLAYLIST_ID.to_string()));
        };

        let (detail, songs) = future::join(self.load_detail(id), self.load_songs(id)).await;
        Ok((detail?, songs?))
    }

    pub async fn load_detail(&self, id: PlaylistId) -> Result<Playlist, PageError> {
        self.view.show_loading();
        let result = self.ctx.gateway.get_detail(id).await;
        self.view.hide_loading();

        match result {
            Ok(playlist) => {
                self.view.render_playlist_info(&playlist);
                Ok(playlist)
            }
            Err(e) => {
                error!(error = %e, id, "Failed to load playlist");
                self.view.show_error(&e.message);
                Err(e.into())
            }
        }
    }

    pub async fn load_songs(&self, id: PlaylistId) -> Result<Vec<Song>, PageError> {
        match self.ctx.gateway.list_songs(id).await {
            Ok(songs) => {
                self.view.render_songs(&songs);
                Ok(songs)
            }
            Err(e) => {
                error!(error = %e, id, "Failed to load songs");
                self.view.show_error(&e.message);
                Err(e.into())
            }
        }
    }

    /// Download the playlist as text into the download directory.
    pub async fn export(&self, id: PlaylistId) -> Result<PathBuf, PageError> {
        self.view.show_loading();
        let result = self.ctx.gateway.export(id).await;
        self.view.hide_loading();

        let file = match result {
            Ok(file) => file,
            Err(e) => {
                error!(error = %e, id, "Failed to export playlist");
                self.view.alert(&e.message);
                return Err(e.into());
            }
        };
        save_export(self.ctx, self.view, &file)
    }
}

/// The download side effect of an export: write the file and tell the user.
pub(super) fn save_export(
    ctx: &AppContext,
    view: &dyn View,
    file: &ExportedFile,
) -> Result<PathBuf, PageError> {
    match file.save_into(&ctx.download_dir) {
        Ok(path) => {
            info!(path = %path.display(), "Export downloaded");
            view.alert(&format!("Exported to {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            let message = format!("Could not save export: {:#}", e);
            view.alert(&message);
            Err(PageError::Local(message))
        }
    }
}
