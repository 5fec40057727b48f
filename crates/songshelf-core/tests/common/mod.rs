//! Shared fixtures for integration tests
//!
//! Provides a scriptable fake backend served by axum on an ephemeral port,
//! a `View` that records everything rendered, and a context builder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use tempfile::TempDir;

use songshelf_core::api::{ApiGateway, GatewaySettings};
use songshelf_core::auth::MemoryStorage;
use songshelf_core::models::{Playlist, RemotePlaylist, Song};
use songshelf_core::{AppContext, NavigationLog, View};

// ============================================================================
// Fake backend
// ============================================================================

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("content-type".to_string(), "text/plain;charset=UTF-8".to_string())],
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct BackendState {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeBackend {
    state: Arc<BackendState>,
    pub base_url: String,
}

impl FakeBackend {
    /// Start serving on 127.0.0.1 with an empty script (every path 404s).
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}/api", addr),
        }
    }

    /// Script the reply for `method` on `path` (path includes `/api`).
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let reply = state
        .replies
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned()
        .unwrap_or_else(|| Reply::text(404, ""));

    let mut builder = Response::builder().status(StatusCode::from_u16(reply.status).unwrap());
    for (name, value) in &reply.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::from(reply.body)).unwrap()
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

// ============================================================================
// Recording view
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Error(String),
    Alert(String),
    Confirm(String),
    Loading,
    Loaded,
    Username(String),
    Playlists(Vec<Playlist>),
    SearchResults(Vec<RemotePlaylist>),
    PlaylistInfo(Playlist),
    Songs(Vec<Song>),
}

pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    confirm_answer: bool,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::answering(true)
    }

    pub fn answering(confirm_answer: bool) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer,
        }
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn rendered_playlists(&self) -> Vec<Vec<Playlist>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Playlists(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn show_error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }

    fn alert(&self, message: &str) {
        self.push(ViewEvent::Alert(message.to_string()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.push(ViewEvent::Confirm(prompt.to_string()));
        self.confirm_answer
    }

    fn show_loading(&self) {
        self.push(ViewEvent::Loading);
    }

    fn hide_loading(&self) {
        self.push(ViewEvent::Loaded);
    }

    fn show_username(&self, name: &str) {
        self.push(ViewEvent::Username(name.to_string()));
    }

    fn render_playlists(&self, playlists: &[Playlist]) {
        self.push(ViewEvent::Playlists(playlists.to_vec()));
    }

    fn render_search_results(&self, results: &[RemotePlaylist]) {
        self.push(ViewEvent::SearchResults(results.to_vec()));
    }

    fn render_playlist_info(&self, playlist: &Playlist) {
        self.push(ViewEvent::PlaylistInfo(playlist.clone()));
    }

    fn render_songs(&self, songs: &[Song]) {
        self.push(ViewEvent::Songs(songs.to_vec()));
    }
}

// ============================================================================
// Context
// ============================================================================

pub struct TestContext {
    pub ctx: AppContext,
    pub navigator: Arc<NavigationLog>,
    pub downloads: TempDir,
}

impl TestContext {
    pub fn new(base_url: &str) -> Self {
        let downloads = tempfile::tempdir().unwrap();
        let navigator = Arc::new(NavigationLog::new());
        let gateway = ApiGateway::new(GatewaySettings {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap();
        let ctx = AppContext::new(
            Arc::new(MemoryStorage::new()),
            gateway,
            navigator.clone(),
            downloads.path().to_path_buf(),
        );
        Self {
            ctx,
            navigator,
            downloads,
        }
    }

    /// Context with a stored session whose token is already on the gateway.
    pub fn signed_in(base_url: &str, token: &str) -> Self {
        let test = Self::new(base_url);
        test.ctx.session.save_token(token).unwrap();
        test.ctx.gateway.set_auth_token(token);
        test
    }

    pub fn download_path(&self, name: &str) -> PathBuf {
        self.downloads.path().join(name)
    }
}
