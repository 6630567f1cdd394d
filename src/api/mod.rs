use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::models::ResultEnvelope;
use crate::scrapers::{fetch, fetch_or_raise, Extractors, PageSource};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PageSource>,
    pub extractors: Arc<Extractors>,
}

/// Build the Axum router: one route per sport plus `/health`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cricket", get(cricket_handler))
        .route("/football", get(football_handler))
        .route("/badminton", get(badminton_handler))
        .route("/kabaddi", get(kabaddi_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn internal_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

/// Success envelopes are 200, failure envelopes 500; the body is the
/// envelope either way.
fn envelope_response<T: Serialize>(envelope: ResultEnvelope<T>) -> Response {
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(envelope)).into_response()
}

/// GET /cricket
async fn cricket_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    fetch_or_raise(state.source.as_ref(), &state.extractors.cricket)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error fetching cricket matches: {}", e);
            internal_error("Failed to fetch cricket matches.")
        })
}

/// GET /football
async fn football_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let envelope = fetch(state.source.as_ref(), &state.extractors.football).await;
    if envelope.success {
        Ok(Json(envelope.data))
    } else {
        Err(internal_error("Failed to fetch football matches."))
    }
}

/// GET /badminton
async fn badminton_handler(State(state): State<Arc<AppState>>) -> Response {
    envelope_response(fetch(state.source.as_ref(), &state.extractors.badminton).await)
}

/// GET /kabaddi
async fn kabaddi_handler(State(state): State<Arc<AppState>>) -> Response {
    envelope_response(fetch(state.source.as_ref(), &state.extractors.kabaddi).await)
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "Server is healthy")
}
