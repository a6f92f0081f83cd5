use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::Claims;
use crate::database::{NewWebtoon, Webtoon, WebtoonSummary};
use crate::error::ApiError;
use crate::validation::validate_webtoon;

/// GET /api/webtoons - list every webtoon (title, description, characters)
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<WebtoonSummary>>, ApiError> {
    state
        .store
        .list()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, "Error fetching webtoons", StatusCode::INTERNAL_SERVER_ERROR))
}

/// GET /api/webtoons/:id - full record
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Webtoon>, ApiError> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, "Error fetching webtoon", StatusCode::INTERNAL_SERVER_ERROR))
}

/// POST /api/webtoons - validate and persist a new webtoon (bearer token required)
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Webtoon>), ApiError> {
    let payload = match body {
        Ok(Json(payload)) => payload,
        // Not sent as JSON: nothing is parsed and every field counts as missing
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Default::default()),
        Err(e) => return Err(ApiError::unhandled(format!("unreadable JSON body: {}", e.body_text()))),
    };

    let validated = validate_webtoon(&payload).map_err(ApiError::validation_failed)?;

    let store_error = |e| ApiError::from_store(e, "Error creating webtoon", StatusCode::BAD_REQUEST);
    let doc = NewWebtoon::try_from(validated).map_err(store_error)?;
    let created = state.store.create(doc).await.map_err(store_error)?;

    info!(
        id = %created.id,
        subject = claims.sub.as_deref().unwrap_or("-"),
        "Created webtoon"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/webtoons/:id - remove permanently (bearer token required)
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_store(e, "Error deleting webtoon", StatusCode::INTERNAL_SERVER_ERROR))?;

    info!(
        id = %id,
        subject = claims.sub.as_deref().unwrap_or("-"),
        "Deleted webtoon"
    );
    Ok(Json(json!({ "message": "Webtoon deleted successfully" })))
}
