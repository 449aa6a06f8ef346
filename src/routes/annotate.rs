//! Annotation Routes
//!
//! Endpoints:
//! - POST /draw - Ink strokes onto a page's drawing layer
//! - POST /erase - Clear strokes from a page's drawing layer
//! - POST /text - Stamp text into a page raster
//! - POST /highlight - Tint a rectangle of a page raster
//! - POST /night - Invert every page raster of the current session

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::annotate::{
    apply_erase, apply_strokes, highlight, invert_page, stamp_text, HighlightRect, Stroke,
    TextPosition,
};
use crate::error::{AppError, OrNotFound, Result};
use crate::state::AppState;

const MISSING_DATA: &str = "Missing data";
const CANVAS_NOT_FOUND: &str = "Canvas not found";
const IMAGE_NOT_FOUND: &str = "Image not found";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    pub page_num: Option<usize>,
    pub draw_data: Option<Vec<Stroke>>,
}

#[derive(Debug, Deserialize)]
pub struct EraseRequest {
    pub page_num: Option<usize>,
    pub erase_data: Option<Vec<Stroke>>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub page_num: Option<usize>,
    pub text: Option<String>,
    pub pos: Option<TextPosition>,
}

#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    pub page_num: Option<usize>,
    pub highlight_rect: Option<HighlightRect>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StatusResponse {
    fn success() -> Json<Self> {
        Json(Self {
            status: "success",
            message: None,
        })
    }

    fn with_message(message: &'static str) -> Json<Self> {
        Json(Self {
            status: "success",
            message: Some(message),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/draw", post(draw))
        .route("/erase", post(erase))
        .route("/text", post(add_text))
        .route("/highlight", post(highlight_area))
        .route("/night", post(night_mode))
}

// ============================================================================
// Validation
// ============================================================================

/// Page numbers start at 1; 0 counts as missing
fn require_page(page_num: Option<usize>) -> Result<usize> {
    page_num
        .filter(|&n| n > 0)
        .ok_or_else(|| AppError::BadRequest(MISSING_DATA.to_string()))
}

fn require_strokes(strokes: Option<Vec<Stroke>>) -> Result<Vec<Stroke>> {
    strokes
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_DATA.to_string()))
}

fn require<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(MISSING_DATA.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /draw
async fn draw(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let Json(request) = payload?;
    let page_num = require_page(request.page_num)?;
    let strokes = require_strokes(request.draw_data)?;

    let points = state
        .store()
        .update_drawing(page_num, move |canvas| apply_strokes(canvas, &strokes))
        .await
        .or_not_found(CANVAS_NOT_FOUND)?;

    tracing::debug!(page = page_num, points, "Drawing updated");
    Ok(StatusResponse::with_message("Drawing updated"))
}

/// POST /erase
async fn erase(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EraseRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let Json(request) = payload?;
    let page_num = require_page(request.page_num)?;
    let strokes = require_strokes(request.erase_data)?;

    let points = state
        .store()
        .update_drawing(page_num, move |canvas| apply_erase(canvas, &strokes))
        .await
        .or_not_found(CANVAS_NOT_FOUND)?;

    tracing::debug!(page = page_num, points, "Erasing updated");
    Ok(StatusResponse::with_message("Erasing updated"))
}

/// POST /text
async fn add_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let Json(request) = payload?;
    let page_num = require_page(request.page_num)?;
    let text = require(request.text)?;
    let pos = require(request.pos)?;

    state
        .store()
        .update_page(page_num, move |page| stamp_text(page, &text, pos))
        .await
        .or_not_found(IMAGE_NOT_FOUND)?;

    tracing::debug!(page = page_num, x = pos.x, y = pos.y, "Text stamped");
    Ok(StatusResponse::success())
}

/// POST /highlight
async fn highlight_area(
    State(state): State<AppState>,
    payload: std::result::Result<Json<HighlightRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>> {
    let Json(request) = payload?;
    let page_num = require_page(request.page_num)?;
    let rect = require(request.highlight_rect)?;

    state
        .store()
        .update_page(page_num, move |page| highlight(page, rect))
        .await
        .or_not_found(IMAGE_NOT_FOUND)?;

    tracing::debug!(page = page_num, ?rect, "Highlight applied");
    Ok(StatusResponse::success())
}

/// POST /night
///
/// Pages are inverted in order. The first missing page aborts with 404 and
/// pages before it stay inverted.
async fn night_mode(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    let page_count = state.sessions().page_count().await;

    for page_num in 1..=page_count {
        state
            .store()
            .update_page(page_num, invert_page)
            .await
            .or_not_found(IMAGE_NOT_FOUND)?;
    }

    tracing::debug!(pages = page_count, "Night mode toggled");
    Ok(StatusResponse::success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_page_rejects_zero() {
        assert_eq!(require_page(Some(3)).unwrap(), 3);
        assert!(matches!(require_page(Some(0)), Err(AppError::BadRequest(_))));
        assert!(matches!(require_page(None), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_require_strokes_rejects_empty() {
        assert!(require_strokes(Some(vec![])).is_err());
        assert!(require_strokes(None).is_err());
        assert_eq!(require_strokes(Some(vec![vec![]])).unwrap().len(), 1);
    }

    #[test]
    fn test_status_response_shape() {
        let plain = serde_json::to_value(&StatusResponse::success().0).unwrap();
        assert_eq!(plain, serde_json::json!({"status": "success"}));

        let message = serde_json::to_value(&StatusResponse::with_message("Drawing updated").0).unwrap();
        assert_eq!(
            message,
            serde_json::json!({"status": "success", "message": "Drawing updated"})
        );
    }
}
