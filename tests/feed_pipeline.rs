//! End-to-end tests for the fetch pipeline: config → client → background
//! load → list state → rendered rows.
//!
//! Each test runs its own mock HTTP server for isolation.

use newsfeed::app::{App, FeedState};
use newsfeed::config::Config;
use newsfeed::feed::{build_client, fetch_articles, FeedEvent};
use newsfeed::ui::render_state;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GUARDIAN_RESPONSE: &str = r#"{
  "response": {
    "status": "ok",
    "userTier": "developer",
    "total": 3,
    "results": [
      {
        "id": "politics/2024/mar/01/a",
        "sectionName": "Politics",
        "webTitle": "Budget vote passes",
        "webUrl": "https://www.theguardian.com/politics/2024/mar/01/a",
        "authorName": "Pol Correspondent"
      },
      {
        "id": "sport/2024/mar/01/b",
        "sectionName": "Sport",
        "webTitle": "Late winner seals title",
        "webUrl": "https://www.theguardian.com/sport/2024/mar/01/b"
      },
      {
        "id": "broken",
        "sectionName": "Opinion",
        "webUrl": "https://www.theguardian.com/opinion/broken"
      }
    ]
  }
}"#;

fn config_for(server: &MockServer) -> Config {
    Config {
        endpoint: format!("{}/search", server.uri()),
        api_key: Some("integration-key".to_string()),
        page_size: Some(3),
        ..Config::default()
    }
}

async fn guardian_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page-size", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GUARDIAN_RESPONSE))
        .mount(&server)
        .await;
    server
}

async fn load(app: &mut App) {
    let (tx, mut rx) = mpsc::channel::<FeedEvent>(4);
    app.refresh(&tx);
    drop(tx);
    while let Some(event) = rx.recv().await {
        if app.handle_event(event) {
            break;
        }
    }
}

#[tokio::test]
async fn test_app_loads_and_renders_feed() {
    let server = guardian_server().await;
    let config = config_for(&server);
    let client = build_client(&config).unwrap();
    let url = format!("{}/search?api-key=integration-key&page-size=3", server.uri());

    let mut app = App::new(client, url);
    load(&mut app).await;

    assert_eq!(app.articles().len(), 2);
    assert_eq!(
        render_state(&app.state, 80),
        vec![
            "  1. Budget vote passes [Politics] by Pol Correspondent".to_string(),
            "  2. Late winner seals title [Sport]".to_string(),
        ]
    );
    assert_eq!(
        app.article(2).map(|a| a.url()),
        Some("https://www.theguardian.com/sport/2024/mar/01/b")
    );
}

#[tokio::test]
async fn test_silent_fetch_matches_app_result() {
    let server = guardian_server().await;
    let config = config_for(&server);
    let client = build_client(&config).unwrap();
    let url = format!("{}/search?page-size=3", server.uri());

    let articles = fetch_articles(&client, &url).await;
    let mut app = App::new(client, url);
    load(&mut app).await;

    assert_eq!(articles.as_slice(), app.articles());
}

#[tokio::test]
async fn test_server_error_shows_failure_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthorized"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&Config::default()).unwrap();
    let mut app = App::new(client, server.uri());
    load(&mut app).await;

    assert_eq!(app.state, FeedState::Failed("HTTP error: status 401".to_string()));
    assert!(app.articles().is_empty());
}

#[tokio::test]
async fn test_empty_feed_is_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#))
        .mount(&server)
        .await;

    let client = build_client(&Config::default()).unwrap();
    let mut app = App::new(client, server.uri());
    load(&mut app).await;

    assert_eq!(app.state, FeedState::Loaded(Vec::new()));
    assert_eq!(render_state(&app.state, 80), vec!["No news to show.".to_string()]);
}

#[tokio::test]
async fn test_config_request_url_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page-size", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GUARDIAN_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = build_client(&config).unwrap();
    let url = config.request_url().unwrap();

    let articles = fetch_articles(&client, url.as_str()).await;
    assert_eq!(articles.len(), 2);
}
