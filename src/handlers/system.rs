use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

const OPENAPI: &str = include_str!("openapi.json");

/// GET /test - liveness probe with a fixed message
pub async fn test() -> impl IntoResponse {
    Json(json!({ "message": "Test route is working" }))
}

/// GET /health - store connectivity check
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable(format!("Database unavailable: {}", e))
    })?;

    Ok(Json(json!({ "status": "ok", "database": "ok" })))
}

/// GET /api-docs - static OpenAPI description
pub async fn api_docs() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], OPENAPI)
}
