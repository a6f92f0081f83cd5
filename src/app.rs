use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::{TokenError, TokenVerifier};
use crate::config::AppConfig;
use crate::database::WebtoonStore;
use crate::error::ApiError;
use crate::handlers::{system, webtoons};
use crate::middleware::{rate_limit, require_bearer, RateLimiter};

/// Process-scoped state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WebtoonStore>,
    pub tokens: Arc<TokenVerifier>,
    /// `None` when rate limiting is disabled
    pub limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(store: Arc<dyn WebtoonStore>, config: &AppConfig) -> Result<Self, TokenError> {
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        Ok(Self {
            store,
            tokens: Arc::new(TokenVerifier::new(&config.security.jwt_secret)?),
            limiter,
        })
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let app = Router::new()
        // Public
        .route("/test", get(system::test))
        .route("/api/test", get(system::test))
        .route("/health", get(system::health))
        .route("/api-docs", get(system::api_docs))
        .merge(webtoon_routes(state.clone()))
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state);

    let app = if config.security.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn webtoon_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/webtoons", get(webtoons::list))
        .route("/api/webtoons/:id", get(webtoons::get));

    let protected = Router::new()
        .route("/api/webtoons", post(webtoons::create))
        .route("/api/webtoons/:id", delete(webtoons::delete))
        .route_layer(middleware::from_fn_with_state(state, require_bearer));

    public.merge(protected)
}

/// Last-resort handler: anything that panics inside the stack lands here
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    ApiError::unhandled(format!("panic: {}", detail)).into_response()
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await
}
