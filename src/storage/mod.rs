//! Page storage
//!
//! Flat-file persistence for uploads, page rasters and drawing layers.

mod page_store;

pub use page_store::{
    drawing_file_name, page_file_name, PageStore, DRAWINGS_DIR, PROCESSED_DIR, UPLOADS_DIR,
};

use std::path::PathBuf;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Requested file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Blocking task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    /// Whether this error means the file is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;
