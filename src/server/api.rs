//! Recipe HTTP API.
//!
//! - POST /generate-recipe
//! - GET /options
//! - GET /health
//! - GET /metrics
//!
//! Every route answers CORS preflight requests from any origin.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::RecipeError;
use crate::recipe::request::{RecipeOptions, RecipeRequest};
use crate::recipe::RecipeGenerator;
use crate::server::metrics::Metrics;

/// Application state shared across handlers.
pub struct AppState {
    pub generator: RecipeGenerator,
    pub config: Arc<Config>,
    pub metrics: Metrics,
    pub shutdown: CancelToken,
    pub start_time: Instant,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate-recipe", post(generate_recipe))
        .route("/options", get(options))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

// ─── Response Types ────────────────────────────────────────────────────────

/// Successful generation: the model's recipe object, unmodified.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: Value,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub model: String,
    pub credential_configured: bool,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, RecipeError> {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("generate_recipe", request_id = request_id);

    let result = match payload {
        Ok(Json(req)) => {
            state
                .generator
                .generate(&req, &state.shutdown)
                .instrument(span)
                .await
        }
        Err(rejection) => Err(RecipeError::InvalidRequest(rejection.body_text())),
    };

    let elapsed = started.elapsed().as_secs_f64();
    match result {
        Ok(recipe) => {
            state.metrics.record("ok", elapsed);
            info!(request_id, elapsed_secs = elapsed, "Recipe request complete");
            Ok(Json(RecipeResponse { recipe }))
        }
        Err(e) => {
            state.metrics.record(e.kind(), elapsed);
            error!(
                request_id,
                error = %e,
                kind = e.kind(),
                status = e.status_code().as_u16(),
                "Recipe request failed"
            );
            Err(e)
        }
    }
}

async fn options() -> Json<RecipeOptions> {
    Json(RecipeOptions::standard())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: state.generator.model().to_string(),
        credential_configured: state.config.upstream.api_key.is_some(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
