//! Route modules for the annotator server

pub mod annotate;
pub mod health;
pub mod pages;
pub mod process;


use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config().render.max_upload_bytes();

    Router::new()
        .merge(health::router())
        .merge(process::router())
        .merge(annotate::router())
        .merge(pages::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
