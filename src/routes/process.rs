//! Upload Route
//!
//! `POST /process` takes a multipart form with the PDF in `pdf_file` and an
//! optional `preprocessing` flag (`"1"` enables it). Every page is
//! rasterized, optionally recentered and inpainted, and written to the page
//! store together with a blank drawing layer. The previous upload's pages
//! are replaced.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::preprocess::preprocess_page;
use crate::session::Session;
use crate::state::AppState;

const FILE_FIELD: &str = "pdf_file";
const PREPROCESS_FIELD: &str = "preprocessing";

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: &'static str,
    pub pages: Vec<String>,
}

/// Parsed multipart form
#[derive(Debug, Default)]
struct UploadForm {
    file_name: String,
    data: Option<Vec<u8>>,
    preprocessing: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/process", post(process_pdf))
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::BadRequest("Failed to read upload".to_string())
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            FILE_FIELD => {
                form.file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read file data: {}", e);
                    AppError::BadRequest("Failed to read file data".to_string())
                })?;
                tracing::debug!("Read {} bytes of file data", data.len());
                form.data = Some(data.to_vec());
            }
            PREPROCESS_FIELD => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid {} field: {}", PREPROCESS_FIELD, e))
                })?;
                form.preprocessing = value.trim() == "1";
            }
            _ => tracing::debug!("Ignoring multipart field '{}'", name),
        }
    }

    Ok(form)
}

/// POST /process
async fn process_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let form = read_form(&mut multipart).await?;
    // A file input left blank still sends the field, with no name and no bytes
    let data = form
        .data
        .filter(|data| !form.file_name.is_empty() && !data.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    let preprocessing = form.preprocessing;

    let store = state.store();
    let _guard = store.lock().await;

    let saved = store.save_upload(&form.file_name, data.clone()).await?;
    let source_name = saved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut session = Session::new(source_name, &data, preprocessing);

    let dpi = state.config().render.dpi;
    let rasters = state.rasterizer().rasterize(data, dpi).await?;
    tracing::info!(
        file = %session.source_name,
        pages = rasters.len(),
        preprocessing,
        "Rasterized upload"
    );

    // Old pages are gone from here on
    store.clear_pages().await?;
    state.sessions().clear().await;

    for raster in rasters {
        let page = tokio::task::spawn_blocking(move || preprocess_page(raster, preprocessing))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

        let (width, height) = page.dimensions();
        let index = session.page_count() + 1;
        store.write_page(index, page).await?;
        store.ensure_drawing(index, width, height).await?;
        session.push_page(width, height);
    }

    let pages = session.page_files();
    state.sessions().replace(session).await;

    Ok(Json(ProcessResponse {
        status: "success",
        pages,
    }))
}
