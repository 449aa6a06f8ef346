//! Morphological operations

use image::{GrayImage, Luma};

/// Dilate once with a 3×3 rectangular structuring element
///
/// Pixels outside the image do not contribute.
pub fn dilate_3x3(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        let x0 = x.saturating_sub(1);
        let y0 = y.saturating_sub(1);
        let x1 = (x + 1).min(width - 1);
        let y1 = (y + 1).min(height - 1);

        let mut max = 0u8;
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                max = max.max(mask.get_pixel(nx, ny).0[0]);
            }
        }
        Luma([max])
    })
}
