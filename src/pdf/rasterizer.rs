//! Page rasterizer
//!
//! Renders every page of a PDF to an RGB raster at a fixed DPI. MuPDF
//! work is CPU bound and not `Send`, so each call opens the document inside
//! a blocking task and never lets MuPDF types cross an await point.

use async_trait::async_trait;
use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};

use super::{RasterizeError, RasterizeResult};

/// PDF user space units per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Converts a PDF into one RGB raster per page, in page order
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, data: Vec<u8>, dpi: u32) -> RasterizeResult<Vec<RgbImage>>;
}

/// MuPDF-backed rasterizer
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfRasterizer;

impl MupdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Rasterizer for MupdfRasterizer {
    async fn rasterize(&self, data: Vec<u8>, dpi: u32) -> RasterizeResult<Vec<RgbImage>> {
        tokio::task::spawn_blocking(move || render_pages(&data, dpi))
            .await
            .map_err(|e| RasterizeError::Task(format!("Task join error: {}", e)))?
    }
}

fn render_pages(data: &[u8], dpi: u32) -> RasterizeResult<Vec<RgbImage>> {
    let document = Document::from_bytes(data, "application/pdf")?;
    let page_count = document.page_count()?;

    let scale = dpi as f32 / POINTS_PER_INCH;
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut pages = Vec::with_capacity(page_count.max(0) as usize);
    for index in 0..page_count {
        let page = document.load_page(index)?;
        let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
        let image = pixmap_to_rgb(&pixmap)?;

        tracing::debug!(
            page = index + 1,
            width = image.width(),
            height = image.height(),
            "Rasterized page"
        );
        pages.push(image);
    }

    Ok(pages)
}

/// Copy pixmap samples into an RGB buffer, dropping alpha if present
fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> RasterizeResult<RgbImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;
    let samples = pixmap.samples();

    if n < 3 {
        return Err(RasterizeError::InvalidPixmap(format!(
            "expected at least 3 components, got {}",
            n
        )));
    }

    let expected = width as usize * height as usize * n;
    if samples.len() < expected {
        return Err(RasterizeError::InvalidPixmap(format!(
            "expected {} samples, got {}",
            expected,
            samples.len()
        )));
    }

    let rgb: Vec<u8> = samples[..expected]
        .chunks_exact(n)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| RasterizeError::InvalidPixmap("Failed to create image buffer".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest well-formed PDF with one blank page of `width` x `height` points
    fn blank_pdf(width: u32, height: u32) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] >>",
                width, height
            ),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_offset = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );
        pdf
    }

    #[tokio::test]
    async fn test_rasterize_blank_page() {
        let pages = MupdfRasterizer::new()
            .rasterize(blank_pdf(72, 144), 100)
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (100, 200));
        assert!(pages[0].pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[tokio::test]
    async fn test_rasterize_rejects_garbage() {
        let result = MupdfRasterizer::new()
            .rasterize(b"definitely not a pdf".to_vec(), 100)
            .await;

        assert!(result.is_err());
    }
}
