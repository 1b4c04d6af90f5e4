//! Route configuration and middleware setup

use crate::error::HttpAppError;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use docintake_core::{AppError, Config};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    HttpAppError::new(AppError::Internal(format!("Handler panicked: {}", detail))).into_response()
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    tracing::info!(
        max_request_body_bytes = config.max_request_body_bytes(),
        "Request body limit enabled"
    );

    Router::new()
        .route("/upload", post(handlers::upload::upload_document))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(config.max_request_body_bytes())),
        )
}
