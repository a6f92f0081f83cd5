// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::validation::FieldError;

/// Body of every response produced by the last-resort error path
pub const UNHANDLED_BODY: &str = "Something broke!";

/// HTTP API error with the status code and body the client sees
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        message: String,
        detail: Option<String>,
    },
    ValidationFailed(Vec<FieldError>),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    InternalServerError {
        message: String,
        detail: Option<String>,
    },

    /// Anything not caught closer to the handler. The detail is logged,
    /// never sent.
    Unhandled(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-facing error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. } => message,
            ApiError::ValidationFailed(_) => "Validation failed",
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::TooManyRequests(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
            ApiError::Unhandled(_) => UNHANDLED_BODY,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationFailed(errors) => json!({ "errors": errors }),
            ApiError::BadRequest { message, detail: Some(detail) }
            | ApiError::InternalServerError { message, detail: Some(detail) } => {
                json!({ "message": message, "error": detail })
            }
            _ => json!({ "message": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        ApiError::ValidationFailed(errors)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn unhandled(detail: impl Into<String>) -> Self {
        ApiError::Unhandled(detail.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Map a store failure: missing records become 404, everything else
    /// becomes `status` with `context` as the message and the store error as
    /// detail.
    pub fn from_store(err: StoreError, context: &str, status: StatusCode) -> Self {
        match err {
            StoreError::NotFound(entity) => ApiError::not_found(format!("{} not found", entity)),
            other => {
                tracing::warn!("{}: {}", context, other);
                if status == StatusCode::BAD_REQUEST {
                    ApiError::bad_request(context, other.to_string())
                } else {
                    ApiError::internal_server_error(context, other.to_string())
                }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing => ApiError::Unauthorized(err.to_string()),
            AuthError::Invalid(ref source) => {
                tracing::debug!("Rejected bearer token: {}", source);
                ApiError::Forbidden(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            ApiError::Unhandled(detail) => {
                tracing::error!("Unhandled error while serving request: {}", detail);
                (status, UNHANDLED_BODY).into_response()
            }
            // Rate-limit rejections are plain text
            ApiError::TooManyRequests(message) => (status, message).into_response(),
            other => (status, Json(other.to_json())).into_response(),
        }
    }
}
