use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod evaluator;
pub mod http;
pub mod logging;
pub mod mcp;

use evaluator::Evaluator;

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<dyn Evaluator>,
}

impl AppState {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self { evaluator }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route(
            "/mcp",
            post(http::handlers::mcp_endpoint)
                .get(http::handlers::mcp_method_not_allowed)
                .delete(http::handlers::mcp_method_not_allowed),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
