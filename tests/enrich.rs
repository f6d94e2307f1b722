//! End-to-end search-and-enrich tests against a local stand-in for the
//! proxy: real HTTP, ephemeral loopback port, millisecond inter-call delay.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::Value;
use serde_json::json;

use concertio::client::DEFAULT_LOCATION;
use concertio::client::DashboardClient;
use concertio::client::SearchCriteria;
use concertio::model::Genre;
use concertio::view;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/api")
}

fn detail(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Event {id}"),
        "classifications": [ { "genre": { "name": if id == "3" { "Jazz" } else { "Rock" } } } ],
        "_embedded": { "attractions": [ { "name": format!("Band {id}") } ] }
    })
}

/// Three stubs; detail for event 2 always fails.
fn flaky_proxy() -> Router {
    Router::new()
        .route(
            "/api/events",
            get(|| async {
                Json(json!({ "_embedded": { "events": [
                    { "id": "1" }, { "id": "2" }, { "id": "3" }
                ] } }))
            }),
        )
        .route(
            "/api/event/:id",
            get(|Path(id): Path<String>| async move {
                if id == "2" {
                    Err(StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    Ok(Json(detail(&id)))
                }
            }),
        )
}

fn client(base_url: String) -> DashboardClient {
    DashboardClient::new(base_url, None).with_detail_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn failed_detail_drops_only_that_event() {
    let base = spawn(flaky_proxy()).await;
    let outcome = client(base)
        .search(&SearchCriteria::default(), DEFAULT_LOCATION)
        .await
        .unwrap();

    let ids: Vec<&str> = outcome.events.iter().map(|e| e.id().as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(outcome.artist_names, vec!["Band 1", "Band 3"]);
}

#[tokio::test]
async fn genre_criteria_filter_the_enriched_set() {
    let base = spawn(flaky_proxy()).await;
    let criteria = SearchCriteria {
        genre: Some(Genre::Rock),
        ..SearchCriteria::default()
    };
    let outcome = client(base).search(&criteria, DEFAULT_LOCATION).await.unwrap();

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].id(), "1");
    // Suggestions come from the enriched set, before filtering.
    assert_eq!(outcome.artist_names, vec!["Band 1", "Band 3"]);
}

#[tokio::test]
async fn absent_embedded_yields_an_empty_dashboard() {
    let app = Router::new().route(
        "/api/events",
        get(|| async { Json(json!({ "page": { "totalElements": 0 } })) }),
    );
    let base = spawn(app).await;
    let outcome = client(base)
        .search(&SearchCriteria::default(), DEFAULT_LOCATION)
        .await
        .unwrap();

    assert!(outcome.events.is_empty());
    assert!(outcome.artist_names.is_empty());
    assert!(view::top_attractions(&outcome.events).is_empty());
    assert_eq!(view::page_count(outcome.events.len()), 0);
}

#[tokio::test]
async fn failed_search_call_aborts_the_operation() {
    let app = Router::new().route(
        "/api/events",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))) }),
    );
    let base = spawn(app).await;
    let result = client(base)
        .search(&SearchCriteria::default(), DEFAULT_LOCATION)
        .await;
    assert!(result.is_err());
}
