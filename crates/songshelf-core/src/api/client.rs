//! Gateway for the playlist backend's REST API.
//!
//! Every call goes through `ApiGateway::send`, which attaches the cached
//! bearer token and routes any failure through `ApiGateway::fail`. That is
//! the one place where errors are normalized, logged and handed to the
//! registered error handlers.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::{ApiError, ErrorHandler, Failure, ResponseBody};
use crate::models::{
    AuthResponse, Credentials, ExportedFile, Playlist, Registration, RemotePlaylist, Song,
};
use crate::navigation::PlaylistId;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Remote service playlists are imported from
pub const DEFAULT_IMPORT_SOURCE: &str = "netease";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name for a full-library export without a Content-Disposition header
const EXPORT_ALL_FILE_NAME: &str = "playlists.txt";

/// Connection settings for a gateway instance.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub import_source: String,
    pub timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            import_source: DEFAULT_IMPORT_SOURCE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Single chokepoint for backend calls.
///
/// The gateway keeps its own copy of the bearer token; it never reads the
/// session store per request, so callers must call
/// [`set_auth_token`](Self::set_auth_token) or
/// [`clear_auth_token`](Self::clear_auth_token) after every token change.
pub struct ApiGateway {
    client: Client,
    base_url: Url,
    import_source: String,
    token: RwLock<Option<String>>,
    handlers: RwLock<Vec<Arc<dyn ErrorHandler>>>,
}

impl ApiGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid base URL: {}", settings.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Base URL cannot carry a path: {}", settings.base_url);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        debug!(base_url = %base_url, "Gateway created");
        Ok(Self {
            client,
            base_url,
            import_source: settings.import_source,
            token: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ===== Header cache =====

    /// Attach `token` to all future requests.
    pub fn set_auth_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    /// Stop attaching a token to future requests.
    pub fn clear_auth_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_auth_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ===== Error hooks =====

    /// Register a handler run on every failed call. Handlers accumulate;
    /// registering one never replaces another.
    pub fn add_error_handler(&self, handler: Arc<dyn ErrorHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    // ===== Request plumbing =====

    fn auth_headers(&self) -> Result<header::HeaderMap, Failure> {
        let mut headers = header::HeaderMap::new();
        let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref token) = *token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                Failure::Request {
                    reason: format!("Token is not a valid header value: {}", e),
                }
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Failure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Failure::Request {
                reason: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments).map_err(|f| self.fail(f))?;
        Ok(self.client.request(method, url))
    }

    /// Send a request, returning the response only if it succeeded.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let headers = self.auth_headers().map_err(|f| self.fail(f))?;

        let response = match builder.headers(headers).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(Failure::from_transport(&e))),
        };

        let status = response.status();
        if status.is_success() {
            debug!(url = %response.url(), %status, "Request succeeded");
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(bytes) => ResponseBody::parse(&bytes),
            Err(e) => {
                warn!(error = %e, "Failed to read error response body");
                ResponseBody::Empty
            }
        };
        Err(self.fail(Failure::Response { status, body }))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let url = response.url().clone();
        response.json().await.map_err(|e| {
            self.fail(Failure::Request {
                reason: format!("Failed to parse JSON response from {}: {}", url, e),
            })
        })
    }

    /// Normalize a failure, run the side effects, and hand back the error.
    fn fail(&self, failure: Failure) -> ApiError {
        let err = failure.normalize();
        match &failure {
            Failure::Response { status, body } => {
                error!(%status, body = %body.truncated(), user_message = %err.message, "API request rejected");
            }
            Failure::NoResponse { reason } => {
                error!(%reason, "API request got no response");
            }
            Failure::Request { reason } => {
                error!(%reason, "API request failed");
            }
        }

        if failure.is_unauthorized() {
            self.clear_auth_token();
        }

        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in handlers {
            handler.on_failure(&failure);
        }
        err
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        self.decode(response).await
    }

    async fn download(&self, segments: &[&str], fallback_name: &str) -> Result<ExportedFile, ApiError> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let contents = response.bytes().await.map_err(|e| {
            self.fail(Failure::Request {
                reason: format!("Failed to read export body: {}", e),
            })
        })?;
        Ok(ExportedFile::new(
            disposition.as_deref(),
            fallback_name,
            contents.to_vec(),
        ))
    }

    // ===== Auth =====

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let builder = self
            .request(Method::POST, &["auth", "signin"])?
            .json(&Credentials { username, password });
        let response = self.send(builder).await?;
        let auth: AuthResponse = self.decode(response).await?;
        info!(username = ?auth.username, "Signed in");
        Ok(auth)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &["auth", "signup"])?
            .json(&Registration {
                username,
                email,
                password,
            });
        self.send(builder).await?;
        info!(username, "Registered");
        Ok(())
    }

    // ===== Playlists =====

    /// Playlists owned by the signed-in user
    pub async fn list_mine(&self) -> Result<Vec<Playlist>, ApiError> {
        self.get_json(&["playlists"]).await
    }

    pub async fn get_detail(&self, id: PlaylistId) -> Result<Playlist, ApiError> {
        self.get_json(&["playlists", &id.to_string()]).await
    }

    pub async fn list_songs(&self, id: PlaylistId) -> Result<Vec<Song>, ApiError> {
        self.get_json(&["playlists", &id.to_string(), "songs"]).await
    }

    /// Copy a playlist from the remote music service into the library.
    pub async fn import_from_remote(&self, remote_id: &str) -> Result<(), ApiError> {
        let builder = self.request(
            Method::POST,
            &["playlists", "import", &self.import_source, remote_id],
        )?;
        self.send(builder).await?;
        info!(remote_id, source = %self.import_source, "Playlist imported");
        Ok(())
    }

    /// Search the remote music service. `keyword` is sent URL-encoded.
    pub async fn search(&self, keyword: &str) -> Result<Vec<RemotePlaylist>, ApiError> {
        let builder = self
            .request(Method::GET, &["playlists", "search"])?
            .query(&[("keyword", keyword)]);
        let response = self.send(builder).await?;
        self.decode(response).await
    }

    /// Delete a playlist. The response body is ignored.
    pub async fn delete(&self, id: PlaylistId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &["playlists", &id.to_string()])?;
        self.send(builder).await?;
        info!(id, "Playlist deleted");
        Ok(())
    }

    /// Download a playlist as a text file.
    pub async fn export(&self, id: PlaylistId) -> Result<ExportedFile, ApiError> {
        let id = id.to_string();
        self.download(
            &["export", "playlist", &id, "txt"],
            &format!("playlist-{}.txt", id),
        )
        .await
    }

    /// Download every playlist of the signed-in user as one text file.
    pub async fn export_all(&self) -> Result<ExportedFile, ApiError> {
        self.download(&["export", "all", "txt"], EXPORT_ALL_FILE_NAME)
            .await
    }
}
