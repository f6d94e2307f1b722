//! Credential-injecting relay in front of the Discovery API.
//!
//! The relay is deliberately dumb: it forwards whatever query parameters it
//! was given, adds the server-held `apikey` (unless the caller supplied one),
//! and hands the upstream JSON body back unchanged. Every failure mode maps
//! to HTTP 500 with an `{"error": …}` envelope; callers get no other status
//! codes.

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::config::Config;

/// Discovery API base, without a trailing slash.
pub const UPSTREAM_BASE: &str = "https://app.ticketmaster.com/discovery/v2";

#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    api_key: Option<String>,
    upstream_base: String,
}

impl ProxyState {
    #[must_use]
    pub fn new(api_key: Option<String>, upstream_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            upstream_base: upstream_base.into(),
        }
    }

    /// Forwards one GET to the upstream with the credential injected.
    async fn relay(&self, url: String, mut params: HashMap<String, String>) -> Result<Value, ProxyError> {
        let key = self.api_key.as_ref().ok_or(ProxyError::MissingKey)?;
        // A caller-supplied apikey wins over the injected one.
        params.entry("apikey".to_string()).or_insert_with(|| key.clone());

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("upstream returned {status} for {url}");
            Err(ProxyError::Upstream(if body.is_empty() {
                status.to_string()
            } else {
                body
            }))
        }
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("API key not configured")]
    MissingKey,
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Builds the relay router: `/api/events` and `/api/event/:id`, CORS open to
/// any origin.
#[must_use]
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/events", get(search_events))
        .route("/api/event/:id", get(event_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn search_events(
    State(state): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    let url = format!("{}/events.json", state.upstream_base);
    state.relay(url, params).await.map(Json)
}

async fn event_detail(
    State(state): State<ProxyState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    let url = format!("{}/events/{id}.json", state.upstream_base);
    state.relay(url, params).await.map(Json)
}

/// Runs the proxy until the process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = ProxyState::new(config.api_key.clone(), UPSTREAM_BASE);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Proxy server running on http://localhost:{}", config.port);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
