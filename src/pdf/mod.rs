//! PDF rasterization

mod rasterizer;

pub use rasterizer::{MupdfRasterizer, Rasterizer};

use thiserror::Error;

/// Rasterization errors
#[derive(Debug, Error)]
pub enum RasterizeError {
    /// MuPDF could not open or render the document
    #[error("MuPDF error: {0}")]
    Mupdf(String),

    /// Pixmap samples do not form a full RGB buffer
    #[error("Invalid pixmap: {0}")]
    InvalidPixmap(String),

    /// Blocking task panicked or was cancelled
    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<mupdf::Error> for RasterizeError {
    fn from(err: mupdf::Error) -> Self {
        RasterizeError::Mupdf(err.to_string())
    }
}

/// Result type alias for rasterization
pub type RasterizeResult<T> = std::result::Result<T, RasterizeError>;
