//! Relay contract tests: the router is driven directly with `oneshot`, and a
//! throwaway axum server on a loopback port stands in for the upstream
//! catalog API.

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::Path;
use axum::extract::Query;
use axum::http::Request;
use axum::http::StatusCode;
use axum::routing::get;
use http_body_util::BodyExt;
use serde_json::Value;
use serde_json::json;
use tower::ServiceExt;

use concertio::proxy::ProxyState;
use concertio::proxy::router;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

fn fake_upstream() -> Router {
    Router::new()
        .route(
            "/events.json",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({ "echo": params }))
            }),
        )
        .route(
            "/events/:file",
            get(|Path(file): Path<String>| async move {
                match file.trim_end_matches(".json") {
                    "bad" => Err((StatusCode::NOT_FOUND, "no such event")),
                    id => Ok(Json(json!({ "id": id, "name": format!("Event {id}") }))),
                }
            }),
        )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn search_without_credential_is_500_with_envelope() {
    let app = router(ProxyState::new(None, "http://unused.invalid"));
    let response = app
        .oneshot(Request::get("/api/events?keyword=x").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "API key not configured" }));
}

#[tokio::test]
async fn detail_without_credential_is_500_with_envelope() {
    let app = router(ProxyState::new(None, "http://unused.invalid"));
    let response = app
        .oneshot(Request::get("/api/event/123").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "API key not configured" }));
}

#[tokio::test]
async fn search_forwards_params_and_injects_the_key() {
    let upstream = spawn(fake_upstream()).await;
    let app = router(ProxyState::new(Some("secret".to_string()), upstream));

    let response = app
        .oneshot(
            Request::get("/api/events?keyword=jazz&radius=200")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let echo = body_json(response).await;
    assert_eq!(echo["echo"]["keyword"], "jazz");
    assert_eq!(echo["echo"]["radius"], "200");
    assert_eq!(echo["echo"]["apikey"], "secret");
}

#[tokio::test]
async fn caller_supplied_key_wins_over_the_injected_one() {
    let upstream = spawn(fake_upstream()).await;
    let app = router(ProxyState::new(Some("secret".to_string()), upstream));

    let response = app
        .oneshot(Request::get("/api/events?apikey=mine").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["echo"]["apikey"], "mine");
}

#[tokio::test]
async fn detail_body_passes_through_unchanged() {
    let upstream = spawn(fake_upstream()).await;
    let app = router(ProxyState::new(Some("secret".to_string()), upstream));

    let response = app
        .oneshot(Request::get("/api/event/42").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": "42", "name": "Event 42" }));
}

#[tokio::test]
async fn upstream_error_body_lands_in_the_envelope() {
    let upstream = spawn(fake_upstream()).await;
    let app = router(ProxyState::new(Some("secret".to_string()), upstream));

    let response = app
        .oneshot(Request::get("/api/event/bad").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "error": "no such event" }));
}
