use super::*;
use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

async fn trends(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    match query.get("topic").map(String::as_str) {
        Some("down") => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "ok": false }))),
        Some(topic) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "topic": topic,
                "source": query.get("source"),
                "data": [
                    { "year": 2025, "advancement": 210 },
                    { "year": 2024, "advancement": 150, "milestone": topic },
                    { "year": "bad", "advancement": 1 }
                ]
            })),
        ),
        None => (StatusCode::BAD_REQUEST, Json(json!({ "ok": false }))),
    }
}

async fn spawn_feed() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/trends", get(trends));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetch_appends_topic_and_normalizes() {
    let origin = spawn_feed().await;
    let feed = HttpGrowthFeed::new(&format!("{origin}/trends"), None, DEFAULT_FEED_TIMEOUT)
        .expect("feed");

    let points = feed.fetch("Swarm Robotics").await.expect("points");
    assert_eq!(
        points,
        vec![
            ProjectionPoint::new(2024, 150.0).with_milestone("Swarm Robotics"),
            ProjectionPoint::new(2025, 210.0),
        ]
    );
}

#[tokio::test]
async fn relative_url_resolves_against_site_origin() {
    let origin = spawn_feed().await;
    let feed = HttpGrowthFeed::new("trends?source=site", Some(&origin), DEFAULT_FEED_TIMEOUT)
        .expect("feed");
    assert_eq!(feed.url().path(), "/trends");
    assert_eq!(
        feed.topic_url("a b").query(),
        Some("source=site&topic=a+b")
    );
    assert_eq!(feed.fetch("AI").await.expect("points").len(), 2);
}

#[tokio::test]
async fn error_status_is_reported() {
    let origin = spawn_feed().await;
    let feed = HttpGrowthFeed::new(&format!("{origin}/trends"), None, DEFAULT_FEED_TIMEOUT)
        .expect("feed");
    let err = feed.fetch("down").await.expect_err("status");
    assert!(matches!(err, SourceError::Status(503)));
    assert_eq!(err.to_string(), "HTTP 503");
}

#[test]
fn malformed_urls_are_rejected() {
    assert!(matches!(
        resolve_feed_url("http://", None),
        Err(SourceError::InvalidUrl { .. })
    ));
    assert!(matches!(
        resolve_feed_url("/trends", None),
        Err(SourceError::InvalidUrl { .. })
    ));
    assert!(matches!(
        resolve_feed_url("/trends", Some("not a url")),
        Err(SourceError::InvalidUrl { .. })
    ));
}
