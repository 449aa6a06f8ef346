//! Error types for the annotator server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::imaging::ImagingError;
use crate::pdf::RasterizeError;
use crate::storage::StorageError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Imaging error: {0}")]
    Imaging(#[from] ImagingError),

    #[error("Rasterization error: {0}")]
    Rasterize(#[from] RasterizeError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Map a missing file to a 404 carrying `message`
pub trait OrNotFound<T> {
    fn or_not_found(self, message: &str) -> Result<T>;
}

impl<T> OrNotFound<T> for std::result::Result<T, StorageError> {
    fn or_not_found(self, message: &str) -> Result<T> {
        self.map_err(|e| {
            if e.is_not_found() {
                tracing::debug!("{}", e);
                AppError::NotFound(message.to_string())
            } else {
                AppError::Storage(e)
            }
        })
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                match e {
                    StorageError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, "File not found".to_string())
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                    ),
                }
            }
            AppError::Imaging(e) => {
                tracing::error!("Imaging error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image processing failed".to_string(),
                )
            }
            AppError::Rasterize(e) => {
                tracing::error!("Rasterization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to rasterize PDF".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            status: "error",
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::BadRequest("Missing data".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("Image not found".into()), StatusCode::NOT_FOUND),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Rasterize(RasterizeError::Mupdf("bad xref".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_or_not_found() {
        let missing: std::result::Result<(), StorageError> =
            Err(StorageError::NotFound(PathBuf::from("page_9.png")));
        match missing.or_not_found("Canvas not found") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Canvas not found"),
            other => panic!("unexpected: {:?}", other),
        }

        let broken: std::result::Result<(), StorageError> =
            Err(StorageError::Task("cancelled".into()));
        assert!(matches!(
            broken.or_not_found("Canvas not found"),
            Err(AppError::Storage(_))
        ));
    }
}
