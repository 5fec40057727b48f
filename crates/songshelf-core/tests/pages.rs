//! Page controller flows end to end against the fake backend.

mod common;

use axum::http::Method;
use serde_json::json;

use common::{FakeBackend, RecordingView, Reply, TestContext, ViewEvent};
use songshelf_core::pages::dashboard::{CONFIRM_DELETE, IMPORTED, MISSING_IMPORT_ID};
use songshelf_core::pages::login::MISSING_CREDENTIALS;
use songshelf_core::pages::playlist_detail::INVALID_PLAYLIST_ID;
use songshelf_core::pages::register::{PASSWORD_MISMATCH, REGISTERED};
use songshelf_core::pages::search::MISSING_KEYWORD;
use songshelf_core::pages::{
    init_page, DashboardPage, LoginPage, PlaylistDetailPage, RegisterPage, SearchPage,
};
use songshelf_core::{PageError, Route};

fn playlist(id: i64, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "songCount": 3, "createdAt": "2024-05-01T10:00:00Z"})
}

// ===== Login / register =====

#[tokio::test]
async fn test_login_success() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/auth/signin",
        Reply::json(200, json!({"token": "t1", "username": "alice"})),
    );
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    LoginPage::new(&test.ctx, &view)
        .submit("alice", "pw")
        .await
        .unwrap();

    assert_eq!(test.ctx.session.token().as_deref(), Some("t1"));
    assert_eq!(test.ctx.session.display_name().as_deref(), Some("alice"));
    assert!(test.ctx.gateway.has_auth_token());
    assert_eq!(test.navigator.current(), Some(Route::Dashboard));
    assert!(view.errors().is_empty());
}

#[tokio::test]
async fn test_login_rejected() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/auth/signin",
        Reply::text(400, "Bad credentials"),
    );
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    let err = LoginPage::new(&test.ctx, &view)
        .submit("alice", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, PageError::Api(_)));
    assert_eq!(view.errors(), vec!["Bad credentials".to_string()]);
    assert_eq!(test.ctx.session.token(), None);
    assert_eq!(test.navigator.current(), None);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let backend = FakeBackend::start().await;
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    let err = LoginPage::new(&test.ctx, &view)
        .submit("alice", "")
        .await
        .unwrap_err();

    assert_eq!(err, PageError::Validation(MISSING_CREDENTIALS.to_string()));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let backend = FakeBackend::start().await;
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    let err = RegisterPage::new(&test.ctx, &view)
        .submit("bob", "b@x.com", "one", "two")
        .await
        .unwrap_err();

    assert_eq!(err, PageError::Validation(PASSWORD_MISMATCH.to_string()));
    assert_eq!(view.errors(), vec![PASSWORD_MISMATCH.to_string()]);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_register_success() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/auth/signup",
        Reply::text(200, "User registered successfully!"),
    );
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    RegisterPage::new(&test.ctx, &view)
        .submit("bob", "b@x.com", "pw", "pw")
        .await
        .unwrap();

    let body: serde_json::Value = serde_json::from_str(&backend.requests()[0].body).unwrap();
    assert_eq!(body, json!({"username": "bob", "email": "b@x.com", "password": "pw"}));
    assert_eq!(view.alerts(), vec![REGISTERED.to_string()]);
    assert_eq!(test.navigator.current(), Some(Route::Login));
}

// ===== Gate =====

#[tokio::test]
async fn test_gate_redirects_without_session() {
    let backend = FakeBackend::start().await;
    let test = TestContext::new(&backend.base_url);
    let view = RecordingView::new();

    assert!(!init_page(&test.ctx, Route::Dashboard, &view));
    assert_eq!(test.navigator.current(), Some(Route::Login));

    let test = TestContext::new(&backend.base_url);
    assert!(init_page(&test.ctx, Route::Login, &view));
    assert_eq!(test.navigator.current(), None);
}

#[tokio::test]
async fn test_gate_attaches_stored_token() {
    let backend = FakeBackend::start().await;
    let test = TestContext::new(&backend.base_url);
    test.ctx.session.save_token("t9").unwrap();
    let view = RecordingView::new();

    assert!(init_page(&test.ctx, Route::Search, &view));
    assert!(test.ctx.gateway.has_auth_token());
    assert_eq!(view.events(), vec![ViewEvent::Username("User".to_string())]);
}

#[tokio::test]
async fn test_logout() {
    let backend = FakeBackend::start().await;
    let test = TestContext::signed_in(&backend.base_url, "t1");

    test.ctx.logout().unwrap();

    assert_eq!(test.ctx.session.token(), None);
    assert!(!test.ctx.gateway.has_auth_token());
    assert_eq!(test.navigator.current(), Some(Route::Login));
}

// ===== Dashboard =====

#[tokio::test]
async fn test_dashboard_loads_playlists() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/api/playlists",
        Reply::json(200, json!([playlist(1, "Morning"), playlist(2, "Evening")])),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let playlists = DashboardPage::new(&test.ctx, &view).init().await.unwrap();

    assert_eq!(playlists.len(), 2);
    assert_eq!(playlists[1].name, "Evening");
    assert_eq!(view.events().first(), Some(&ViewEvent::Loading));
    assert_eq!(view.rendered_playlists(), vec![playlists]);
}

#[tokio::test]
async fn test_dashboard_unauthorized_redirects() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/api/playlists", Reply::text(401, ""));
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let err = DashboardPage::new(&test.ctx, &view).init().await.unwrap_err();

    assert!(matches!(err, PageError::Api(ref e) if e.is_unauthorized()));
    assert_eq!(test.ctx.session.token(), None);
    assert_eq!(test.navigator.current(), Some(Route::Login));
    assert_eq!(view.errors().len(), 1);
}

#[tokio::test]
async fn test_delete_then_reload() {
    let backend = FakeBackend::start().await;
    backend.on(Method::DELETE, "/api/playlists/7", Reply::text(200, ""));
    backend.on(
        Method::GET,
        "/api/playlists",
        Reply::json(200, json!([playlist(8, "Kept")])),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let deleted = DashboardPage::new(&test.ctx, &view)
        .request_delete(7)
        .await
        .unwrap();
    assert!(deleted);

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(requests[0].path, "/api/playlists/7");
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].path, "/api/playlists");

    let rendered = view.rendered_playlists();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0][0].id, 8);
    assert!(view
        .events()
        .contains(&ViewEvent::Confirm(CONFIRM_DELETE.to_string())));
}

#[tokio::test]
async fn test_delete_declined() {
    let backend = FakeBackend::start().await;
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::answering(false);

    let deleted = DashboardPage::new(&test.ctx, &view)
        .request_delete(7)
        .await
        .unwrap();

    assert!(!deleted);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_delete_failure_skips_reload() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::DELETE,
        "/api/playlists/7",
        Reply::json(403, json!({"message": "Not your playlist"})),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    DashboardPage::new(&test.ctx, &view)
        .delete_playlist(7)
        .await
        .unwrap_err();

    assert_eq!(view.alerts(), vec!["Not your playlist".to_string()]);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_dashboard_import() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/playlists/import/netease/24381616",
        Reply::json(200, json!({"id": 3})),
    );
    backend.on(
        Method::GET,
        "/api/playlists",
        Reply::json(200, json!([playlist(3, "Imported")])),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();
    let page = DashboardPage::new(&test.ctx, &view);

    let err = page.import_playlist("   ").await.unwrap_err();
    assert_eq!(err, PageError::Validation(MISSING_IMPORT_ID.to_string()));
    assert_eq!(backend.request_count(), 0);

    page.import_playlist(" 24381616 ").await.unwrap();
    assert_eq!(
        view.alerts(),
        vec![MISSING_IMPORT_ID.to_string(), IMPORTED.to_string()]
    );
    assert_eq!(view.rendered_playlists().len(), 1);
}

#[tokio::test]
async fn test_export_all_saves_file() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/api/export/all/txt",
        Reply::text(200, "Morning\nEvening\n")
            .with_header("content-disposition", "attachment; filename=\"library.txt\""),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let path = DashboardPage::new(&test.ctx, &view)
        .export_all()
        .await
        .unwrap();

    assert_eq!(path, test.download_path("library.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Morning\nEvening\n");
    assert_eq!(
        view.alerts(),
        vec![format!("Exported to {}", path.display())]
    );
}

// ===== Search =====

#[tokio::test]
async fn test_empty_search_sends_nothing() {
    let backend = FakeBackend::start().await;
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let err = SearchPage::new(&test.ctx, &view)
        .perform_search("  ")
        .await
        .unwrap_err();

    assert_eq!(err, PageError::Validation(MISSING_KEYWORD.to_string()));
    assert_eq!(view.alerts(), vec![MISSING_KEYWORD.to_string()]);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_search_renders_results() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/api/playlists/search",
        Reply::json(200, json!([{"id": "42", "name": "Jazz", "trackCount": 12}])),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let results = SearchPage::new(&test.ctx, &view)
        .perform_search(" jazz ")
        .await
        .unwrap();

    assert_eq!(results[0].name, "Jazz");
    assert_eq!(backend.requests()[0].query.as_deref(), Some("keyword=jazz"));
    assert!(view
        .events()
        .contains(&ViewEvent::SearchResults(results.clone())));
}

#[tokio::test]
async fn test_search_import_goes_to_dashboard() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/playlists/import/netease/42",
        Reply::json(200, json!({"id": 3})),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    SearchPage::new(&test.ctx, &view)
        .import_playlist("42")
        .await
        .unwrap();

    assert_eq!(view.alerts(), vec![IMPORTED.to_string()]);
    assert_eq!(test.navigator.current(), Some(Route::Dashboard));
}

#[tokio::test]
async fn test_search_import_failure_shows_message() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/api/playlists/import/netease/42",
        Reply::json(409, json!({"message": "Already imported"})),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    SearchPage::new(&test.ctx, &view)
        .import_playlist("42")
        .await
        .unwrap_err();

    assert_eq!(view.alerts(), vec!["Already imported".to_string()]);
    assert_eq!(test.navigator.current(), None);
}

// ===== Playlist detail =====

#[tokio::test]
async fn test_detail_invalid_id() {
    let backend = FakeBackend::start().await;
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let err = PlaylistDetailPage::new(&test.ctx, &view)
        .init(Some("abc"))
        .await
        .unwrap_err();

    assert_eq!(err, PageError::Validation(INVALID_PLAYLIST_ID.to_string()));
    assert_eq!(view.errors(), vec![INVALID_PLAYLIST_ID.to_string()]);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_detail_loads_info_and_songs() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/api/playlists/5", Reply::json(200, playlist(5, "Drive")));
    backend.on(
        Method::GET,
        "/api/playlists/5/songs",
        Reply::json(
            200,
            json!([
                {"id": 1, "name": "Song A", "artist": "Band", "album": "LP", "duration": 185},
                {"id": 2, "name": "Song B"}
            ]),
        ),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let (playlist, songs) = PlaylistDetailPage::new(&test.ctx, &view)
        .init(Some("5"))
        .await
        .unwrap();

    assert_eq!(playlist.name, "Drive");
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0].display_duration(), "3:05");
    let events = view.events();
    assert!(events.contains(&ViewEvent::PlaylistInfo(playlist)));
    assert!(events.contains(&ViewEvent::Songs(songs)));
}

#[tokio::test]
async fn test_detail_songs_fail_independently() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/api/playlists/5", Reply::json(200, playlist(5, "Drive")));
    backend.on(
        Method::GET,
        "/api/playlists/5/songs",
        Reply::json(500, json!({"error": "Upstream timeout"})),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    PlaylistDetailPage::new(&test.ctx, &view)
        .init(Some("5"))
        .await
        .unwrap_err();

    let events = view.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ViewEvent::PlaylistInfo(p) if p.id == 5)));
    assert_eq!(view.errors(), vec!["Upstream timeout".to_string()]);
}

#[tokio::test]
async fn test_detail_export_falls_back_to_id_name() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/api/export/playlist/5/txt",
        Reply::text(200, "Song A - Band\n"),
    );
    let test = TestContext::signed_in(&backend.base_url, "t1");
    let view = RecordingView::new();

    let path = PlaylistDetailPage::new(&test.ctx, &view)
        .export(5)
        .await
        .unwrap();

    assert_eq!(path, test.download_path("playlist-5.txt"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "Song A - Band\n");
}
