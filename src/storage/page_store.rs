//! Page Store
//!
//! On-disk layout under the data directory:
//!
//! ```text
//! <data_dir>/
//!   uploads/            original PDFs as uploaded
//!   processed_pages/    page_<n>.png          base page rasters
//!   drawings/           page_<n>_drawing.png  drawing layers
//! ```
//!
//! Every write goes to a temporary file in the target directory and is
//! renamed over the destination, so readers never observe a partial PNG.
//! Read-modify-write updates are serialized through a store-wide mutex.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, MutexGuard};

use super::{StorageError, StorageResult};
use crate::annotate::blank_canvas;

/// Uploaded PDFs
pub const UPLOADS_DIR: &str = "uploads";
/// Base page rasters
pub const PROCESSED_DIR: &str = "processed_pages";
/// Drawing layers
pub const DRAWINGS_DIR: &str = "drawings";

const FALLBACK_UPLOAD_NAME: &str = "upload.pdf";

/// File name of the base raster for a 1-based page index
pub fn page_file_name(index: usize) -> String {
    format!("page_{}.png", index)
}

/// File name of the drawing layer for a 1-based page index
pub fn drawing_file_name(index: usize) -> String {
    format!("page_{}_drawing.png", index)
}

/// Flat-file store for pages and drawing layers
#[derive(Clone)]
pub struct PageStore {
    inner: Arc<PageStoreInner>,
}

struct PageStoreInner {
    uploads_dir: PathBuf,
    pages_dir: PathBuf,
    drawings_dir: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl PageStore {
    /// Create a store rooted at `data_dir`; call `init` before use
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let root = data_dir.as_ref();
        Self {
            inner: Arc::new(PageStoreInner {
                uploads_dir: root.join(UPLOADS_DIR),
                pages_dir: root.join(PROCESSED_DIR),
                drawings_dir: root.join(DRAWINGS_DIR),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Create the directory layout if missing
    pub async fn init(&self) -> StorageResult<()> {
        for dir in [
            &self.inner.uploads_dir,
            &self.inner.pages_dir,
            &self.inner.drawings_dir,
        ] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.inner.uploads_dir
    }

    pub fn pages_dir(&self) -> &Path {
        &self.inner.pages_dir
    }

    pub fn drawings_dir(&self) -> &Path {
        &self.inner.drawings_dir
    }

    pub fn page_path(&self, index: usize) -> PathBuf {
        self.inner.pages_dir.join(page_file_name(index))
    }

    pub fn drawing_path(&self, index: usize) -> PathBuf {
        self.inner.drawings_dir.join(drawing_file_name(index))
    }

    /// Hold the store-wide write lock
    ///
    /// Used by the upload pipeline to make clear + repopulate exclusive.
    /// `update_page` and `update_drawing` take it themselves, so they must
    /// not be called while the guard is alive.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.write_lock.lock().await
    }

    /// Persist an uploaded PDF; returns the stored path
    ///
    /// Only the final path component of `file_name` is kept.
    pub async fn save_upload(&self, file_name: &str, data: Vec<u8>) -> StorageResult<PathBuf> {
        let path = self.inner.uploads_dir.join(sanitize_file_name(file_name));
        let target = path.clone();
        blocking(move || write_atomic(&target, &data)).await?;
        Ok(path)
    }

    /// Remove every regular file from the page and drawing directories
    ///
    /// Files that cannot be removed are logged and skipped. Returns the
    /// number of files removed.
    pub async fn clear_pages(&self) -> StorageResult<usize> {
        let mut removed = 0;
        for dir in [&self.inner.pages_dir, &self.inner.drawings_dir] {
            let mut entries = tokio::fs::read_dir(dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                if !is_file {
                    continue;
                }
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!(path = %path.display(), "Failed to delete: {}", e),
                }
            }
        }

        tracing::debug!(removed, "Cleared page and drawing directories");
        Ok(removed)
    }

    /// Write a base page raster
    pub async fn write_page(&self, index: usize, image: RgbImage) -> StorageResult<()> {
        let path = self.page_path(index);
        blocking(move || save_png_atomic(&path, &image)).await
    }

    /// Create an all-blank drawing layer unless one already exists
    ///
    /// Returns `true` when a new layer was written.
    pub async fn ensure_drawing(&self, index: usize, width: u32, height: u32) -> StorageResult<bool> {
        let path = self.drawing_path(index);
        if tokio::fs::try_exists(&path).await? {
            return Ok(false);
        }

        blocking(move || save_png_atomic(&path, &blank_canvas(width, height))).await?;
        Ok(true)
    }

    /// Read a base page raster
    pub async fn read_page(&self, index: usize) -> StorageResult<RgbImage> {
        let path = self.page_path(index);
        blocking(move || load_rgb(&path)).await
    }

    /// Read a drawing layer
    pub async fn read_drawing(&self, index: usize) -> StorageResult<RgbImage> {
        let path = self.drawing_path(index);
        blocking(move || load_rgb(&path)).await
    }

    /// Read, mutate and rewrite a base page raster
    pub async fn update_page<F, T>(&self, index: usize, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut RgbImage) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.inner.write_lock.lock().await;
        update_file(self.page_path(index), f).await
    }

    /// Read, mutate and rewrite a drawing layer
    pub async fn update_drawing<F, T>(&self, index: usize, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut RgbImage) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.inner.write_lock.lock().await;
        update_file(self.drawing_path(index), f).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn blocking<F, T>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}

async fn update_file<F, T>(path: PathBuf, f: F) -> StorageResult<T>
where
    F: FnOnce(&mut RgbImage) -> T + Send + 'static,
    T: Send + 'static,
{
    blocking(move || {
        let mut image = load_rgb(&path)?;
        let output = f(&mut image);
        save_png_atomic(&path, &image)?;
        Ok(output)
    })
    .await
}

fn load_rgb(path: &Path) -> StorageResult<RgbImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io(e)
        }
    })?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

fn save_png_atomic(path: &Path, image: &RgbImage) -> StorageResult<()> {
    let mut encoded = Vec::new();
    image.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)?;
    write_atomic(path, &encoded)
}

fn write_atomic(path: &Path, data: &[u8]) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

fn sanitize_file_name(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string())
}

// ============================================================================
// Tests
// ============================================================================
