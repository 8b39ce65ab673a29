use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Dashboard;

// ---

pub fn router() -> Router<Arc<Dashboard>> {
    // ---
    Router::new()
        .route("/api/dashboard", get(current_view))
        .route("/api/view/toggle", post(toggle_view))
        .route("/api/threshold", post(set_threshold))
}

async fn current_view(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    // ---
    debug!("GET /api/dashboard");
    Json(dashboard.view().await)
}

async fn toggle_view(State(dashboard): State<Arc<Dashboard>>) -> impl IntoResponse {
    // ---
    let view = dashboard.toggle_view().await;
    info!("POST /api/view/toggle - now in {:?} mode", view.mode);
    Json(view)
}

/// Body of `POST /api/threshold`.
#[derive(Debug, Deserialize)]
pub struct ThresholdRequest {
    value: f64,
}

#[derive(Debug, Serialize)]
struct ThresholdResponse {
    threshold: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn set_threshold(
    State(dashboard): State<Arc<Dashboard>>,
    Json(req): Json<ThresholdRequest>,
) -> impl IntoResponse {
    // ---
    info!("POST /api/threshold - value={}", req.value);

    // JSON has no NaN or inf; a non-number body is rejected by the extractor.
    match dashboard.set_threshold(req.value).await {
        Ok(threshold) => (StatusCode::OK, Json(ThresholdResponse { threshold })).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("Error updating temperature limit: {}", e),
            }),
        )
            .into_response(),
    }
}
