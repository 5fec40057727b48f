use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::storage::Storage;
use crate::api::ApiGateway;
use crate::models::UserInfo;
use crate::navigation::{Navigator, Route};

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the display name
pub const USERNAME_KEY: &str = "username";

/// Shown in the page header when no display name was stored
const DEFAULT_DISPLAY_NAME: &str = "User";

/// Point-in-time view of the persisted session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    /// A session without a token is unauthenticated, whatever else it holds.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Sole owner of the persisted token and display name.
///
/// Clone is cheap; clones share the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// Persist `token`, replacing any previous one. The shape is not checked.
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.storage.set(TOKEN_KEY, token)?;
        debug!("Token saved");
        Ok(())
    }

    /// Remove the token. Clearing an absent token is a no-op.
    pub fn clear_token(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        debug!("Token cleared");
        Ok(())
    }

    /// Presence check only; an expired token still counts until the backend
    /// rejects it.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist the display name if the user record carries one.
    pub fn save_user_info(&self, user: &UserInfo) -> Result<()> {
        match user.display_name.as_deref() {
            Some(name) if !name.is_empty() => self.storage.set(USERNAME_KEY, name),
            _ => Ok(()),
        }
    }

    pub fn display_name(&self) -> Option<String> {
        self.storage.get(USERNAME_KEY)
    }

    pub fn display_name_or_default(&self) -> String {
        self.display_name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    pub fn snapshot(&self) -> Session {
        Session {
            token: self.token(),
            display_name: self.display_name(),
        }
    }

    /// Drop the token, detach it from the gateway and go to the login page.
    ///
    /// Navigation happens even if the storage write fails, so the user is
    /// never left on an authenticated page.
    pub fn logout(&self, gateway: &ApiGateway, navigator: &dyn Navigator) -> Result<()> {
        let cleared = self.clear_token();
        if let Err(ref e) = cleared {
            warn!(error = %e, "Failed to clear token during logout");
        }
        gateway.clear_auth_token();
        info!("Logged out");
        navigator.navigate(Route::Login);
        cleared
    }
}
