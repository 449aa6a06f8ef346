//! Raster primitives
//!
//! Small, allocation-light operations over `image` buffers used by the
//! preprocessor, the compositor and the annotation operations:
//!
//! - `gray`: BT.601 luma conversion
//! - `threshold`: Otsu level, binary thresholds, foreground bounds
//! - `morphology`: 3×3 dilation
//! - `geometry`: integer translation with constant border
//! - `draw`: filled circles, filled rectangles, weighted blend, inversion
//! - `font`: 5×7 bitmap text
//! - `inpaint`: Telea fast-marching inpainting
//!
//! Everything here is synchronous and CPU bound. Callers in async context
//! run these through `tokio::task::spawn_blocking`.

pub mod draw;
pub mod font;
pub mod geometry;
pub mod gray;
pub mod inpaint;
pub mod morphology;
pub mod threshold;

use thiserror::Error;

pub use draw::{blend_rect, fill_circle, fill_rect, invert};
pub use font::draw_text;
pub use geometry::translate;
pub use gray::to_gray;
pub use inpaint::inpaint_telea;
pub use morphology::dilate_3x3;
pub use threshold::{foreground_bounds, otsu_level, threshold_binary, threshold_binary_inv, Bounds};

/// Raster operation errors
#[derive(Debug, Error)]
pub enum ImagingError {
    /// Two images that must be pixel-aligned are not
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Encoding or decoding failed
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Result type alias for raster operations
pub type ImagingResult<T> = std::result::Result<T, ImagingError>;

/// Fail unless both dimension pairs are equal
pub fn ensure_same_dimensions(expected: (u32, u32), actual: (u32, u32)) -> ImagingResult<()> {
    if expected != actual {
        return Err(ImagingError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &image::RgbImage) -> ImagingResult<Vec<u8>> {
    let mut output = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut output), image::ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_ensure_same_dimensions() {
        assert!(ensure_same_dimensions((4, 3), (4, 3)).is_ok());

        let err = ensure_same_dimensions((4, 3), (3, 4)).unwrap_err();
        assert!(matches!(
            err,
            ImagingError::DimensionMismatch {
                expected: (4, 3),
                actual: (3, 4)
            }
        ));
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let img = RgbImage::from_pixel(7, 5, Rgb([12, 200, 34]));
        let bytes = encode_png(&img).unwrap();

        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }
}
