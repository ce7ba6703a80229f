use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::domain::{Story, StoryId};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

#[derive(Clone, Default)]
struct ApiState {
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl ApiState {
    async fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().await.clone()
    }
}

fn mock_page() -> StoryPage {
    StoryPage {
        stories: vec![Story {
            id: StoryId(1),
            title: "Test Story 1".to_string(),
            url: "http://www.teststory1.com".to_string(),
        }],
        total_count: 100,
    }
}

async fn handle_stories(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<StoryPage> {
    state.requests.lock().await.push(params);
    Json(mock_page())
}

async fn handle_failure(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.lock().await.push(params);
    (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching data")
}

async fn handle_garbage() -> &'static str {
    "<html>not json</html>"
}

async fn spawn_stories_api() -> anyhow::Result<(String, ApiState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ApiState::default();
    let app = Router::new()
        .route("/api/stories", get(handle_stories))
        .route("/api/broken", get(handle_failure))
        .route("/api/garbage", get(handle_garbage))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn sends_page_page_size_and_search_title() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/stories")).expect("service");

    let page = service
        .fetch_top_stories(&StoryQuery::new(1, 20, "Test"))
        .await
        .expect("fetch");

    assert_eq!(page, mock_page());
    let requests = api.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("page").map(String::as_str), Some("1"));
    assert_eq!(requests[0].get("pageSize").map(String::as_str), Some("20"));
    assert_eq!(requests[0].get("searchTitle").map(String::as_str), Some("Test"));
}

#[tokio::test]
async fn sends_custom_paging_parameters() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/stories")).expect("service");

    service
        .fetch_top_stories(&StoryQuery::new(2, 10, "Test"))
        .await
        .expect("fetch");

    let requests = api.requests().await;
    assert_eq!(requests[0].get("page").map(String::as_str), Some("2"));
    assert_eq!(requests[0].get("pageSize").map(String::as_str), Some("10"));
    assert_eq!(requests[0].get("searchTitle").map(String::as_str), Some("Test"));
}

#[tokio::test]
async fn empty_search_omits_search_title() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/stories")).expect("service");

    service
        .fetch_top_stories(&StoryQuery::new(3, 20, ""))
        .await
        .expect("fetch");

    let requests = api.requests().await;
    assert!(!requests[0].contains_key("searchTitle"));
    assert_eq!(requests[0].len(), 2);
}

#[tokio::test]
async fn search_title_survives_url_encoding() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/stories")).expect("service");

    service
        .fetch_top_stories(&StoryQuery::new(1, 20, "Rust & C++ = fast?"))
        .await
        .expect("fetch");

    let requests = api.requests().await;
    assert_eq!(
        requests[0].get("searchTitle").map(String::as_str),
        Some("Rust & C++ = fast?")
    );
}

#[tokio::test]
async fn defaulted_call_uses_first_page_of_twenty() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/stories")).expect("service");

    service
        .fetch_top_stories_with(None, None, None)
        .await
        .expect("fetch");

    let requests = api.requests().await;
    assert_eq!(requests[0].get("page").map(String::as_str), Some("1"));
    assert_eq!(requests[0].get("pageSize").map(String::as_str), Some("20"));
    assert!(!requests[0].contains_key("searchTitle"));
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_text() {
    let (server_url, api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/broken")).expect("service");

    let err = service
        .fetch_top_stories(&StoryQuery::default())
        .await
        .expect_err("must fail");

    match err {
        FetchError::Status {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(status_text, "Internal Server Error");
            assert_eq!(body, "Error fetching data");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(api.requests().await.len(), 1);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (server_url, _api) = spawn_stories_api().await.expect("spawn api");
    let service = HttpStoryService::new(&format!("{server_url}/api/garbage")).expect("service");

    let err = service
        .fetch_top_stories(&StoryQuery::default())
        .await
        .expect_err("must fail");

    assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpStoryService::new(&format!("http://{addr}/api/stories")).expect("service");
    let err = service
        .fetch_top_stories(&StoryQuery::default())
        .await
        .expect_err("must fail");

    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {err}");
    assert_eq!(err.status(), None);
}

#[test]
fn rejects_unparsable_base_url() {
    let err = HttpStoryService::new("not a url").expect_err("must fail");
    assert!(matches!(err, FetchError::InvalidUrl { .. }));
}

#[test]
fn from_settings_uses_configured_url() {
    let settings = Settings {
        api_url: "https://stories.example/api/stories".to_string(),
        ..Settings::default()
    };
    let service = HttpStoryService::from_settings(&settings).expect("service");
    assert_eq!(
        service.base_url().as_str(),
        "https://stories.example/api/stories"
    );
}
