//! Page Routes
//!
//! Endpoints:
//! - GET /page/:page_num - Live composite of a page and its drawing layer (PNG)
//! - GET /session - Current session record
//! - GET /favicon.ico - Empty response

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::composite::composite_page;
use crate::error::{AppError, OrNotFound, Result};
use crate::imaging::encode_png;
use crate::session::Session;
use crate::state::AppState;

const PAGE_NOT_FOUND: &str = "Page not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page/:page_num", get(serve_page))
        .route("/session", get(current_session))
        .route("/favicon.ico", get(favicon))
}

/// GET /page/:page_num
///
/// Non-numeric page numbers are treated as unknown pages. A page whose
/// drawing layer is missing is served as its bare raster.
async fn serve_page(
    State(state): State<AppState>,
    Path(page_num): Path<String>,
) -> Result<Response> {
    let page_num: usize = page_num
        .parse()
        .map_err(|_| AppError::NotFound(PAGE_NOT_FOUND.to_string()))?;

    let store = state.store();
    let page = store.read_page(page_num).await.or_not_found(PAGE_NOT_FOUND)?;
    let canvas = match store.read_drawing(page_num).await {
        Ok(canvas) => Some(canvas),
        Err(e) if e.is_not_found() => {
            tracing::warn!(page = page_num, "Drawing layer missing, serving bare page");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let data = tokio::task::spawn_blocking(move || match canvas {
        Some(canvas) => encode_png(&composite_page(&page, &canvas)?),
        None => encode_png(&page),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    tracing::debug!(page = page_num, bytes = data.len(), "Serving composite");

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        data,
    )
        .into_response())
}

/// GET /session
async fn current_session(State(state): State<AppState>) -> Result<Json<Session>> {
    state
        .sessions()
        .current()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No document uploaded".to_string()))
}

/// GET /favicon.ico
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
