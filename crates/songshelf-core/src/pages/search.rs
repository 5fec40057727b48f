use tracing::error;

use super::{AppContext, PageError, View};
use crate::models::RemotePlaylist;
use crate::navigation::Route;

use super::dashboard::{IMPORTED, MISSING_IMPORT_ID};

pub const MISSING_KEYWORD: &str = "Please enter a keyword";

/// Search on the remote music service.
pub struct SearchPage<'a> {
    ctx: &'a AppContext,
    view: &'a dyn View,
}

impl<'a> SearchPage<'a> {
    pub fn new(ctx: &'a AppContext, view: &'a dyn View) -> Self {
        Self { ctx, view }
    }

    /// Search for `keyword`. Blank keywords are rejected without a request.
    pub async fn perform_search(&self, keyword: &str) -> Result<Vec<RemotePlaylist>, PageError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.view.alert(MISSING_KEYWORD);
            return Err(PageError::Validation(MISSING_KEYWORD.to_string()));
        }

        self.view.show_loading();
        let result = self.ctx.gateway.search(keyword).await;
        self.view.hide_loading();

        match result {
            Ok(results) => {
                self.view.render_search_results(&results);
                Ok(results)
            }
            Err(e) => {
                error!(error = %e, keyword, "Search failed");
                self.view.show_error(&e.message);
                Err(e.into())
            }
        }
    }

    /// Import one search result and go to the dashboard.
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
        self.ctx.navigator.navigate(Route::Dashboard);
        Ok(())
    }
}
