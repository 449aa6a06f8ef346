//! Grayscale conversion

use image::{GrayImage, Luma, RgbImage};

// BT.601 weights in 14-bit fixed point (sum = 1 << 14)
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

/// Luma of a single RGB triple, rounded
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((weighted + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Convert an RGB image to 8-bit grayscale using BT.601 weights
///
/// `image`'s own `to_luma8` uses Rec.709 coefficients, which shifts the
/// Otsu level on scanned pages; this keeps the classic video weights.
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
    }

    #[test]
    fn test_luma_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn test_to_gray_keeps_dimensions() {
        let img = RgbImage::from_pixel(9, 4, Rgb([128, 128, 128]));
        let gray = to_gray(&img);

        assert_eq!(gray.dimensions(), (9, 4));
        assert!(gray.pixels().all(|p| p.0[0] == 128));
    }
}
