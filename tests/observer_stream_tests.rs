use axum::{
    Router,
    body::{Body, BodyDataStream},
    http::{Request, StatusCode},
};
use futures::StreamExt;
use std::time::Duration;
use tablecast::{TablecastState, config::SyncConfig, service, tablecast_router};
use tokio::time::timeout;
use tower::ServiceExt;

async fn app() -> Router {
    let store = service::spawn(8).await;
    tablecast_router(TablecastState::new(store, &SyncConfig::default()))
}

/// Reads SSE frames until the accumulated text contains `needle`.
async fn read_until(stream: &mut BodyDataStream, seen: &mut String, needle: &str) {
    while !seen.contains(needle) {
        let chunk = timeout(Duration::from_secs(2), stream.next())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for `{needle}`; got:\n{seen}"))
            .expect("stream ended")
            .expect("body error");
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
}

fn observer_id(seen: &str) -> String {
    let start = seen.find("\"observerId\":\"").expect("observerId in registered event") + 14;
    let len = seen[start..].find('"').expect("closing quote");
    seen[start..start + len].to_string()
}

#[tokio::test]
async fn stream_announces_itself_then_pushes_updates() {
    let app = app().await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/observers")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/event-stream")
    );

    let mut stream = resp.into_body().into_data_stream();
    let mut seen = String::new();
    read_until(&mut stream, &mut seen, "event: registered").await;
    read_until(&mut stream, &mut seen, "\"cause\":\"Register\"").await;
    let id = observer_id(&seen);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tables")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"T"}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    read_until(&mut stream, &mut seen, "\"cause\":\"AddTable\"").await;

    // The originator of a replace is skipped; the next ordinary mutation still arrives.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/tables/T")
                .header("content-type", "application/json")
                .header("x-observer-id", id.as_str())
                .body(Body::from(r#"{"name":"T","columns":[],"rows":[]}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/tables/T")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    read_until(&mut stream, &mut seen, "\"cause\":\"RemoveTable\"").await;
    assert!(!seen.contains("ReplaceTable"));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/observers/{id}"))
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let end = timeout(Duration::from_secs(2), stream.next())
        .await
        .expect("stream did not end after unregister");
    assert!(end.is_none());
}

#[tokio::test]
async fn bad_observer_ids_are_rejected() {
    let app = app().await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/observers/not-a-uuid")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/observers/9b2f6c1e-0d7a-4c55-9e43-3c1f6a2b8d10")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
