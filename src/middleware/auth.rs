use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// JWT authentication middleware for write routes.
///
/// Missing header answers 401, anything unverifiable answers 403. On success
/// the decoded `Claims` are inserted into the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not valid UTF-8 is present but unusable
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let claims = state.tokens.verify_header(header)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
