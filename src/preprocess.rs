//! Page preprocessing
//!
//! Recenters the text block of a scanned page and repairs the border seam
//! left behind by the shift.
//!
//! 1. Inverse-Otsu binarization (ink becomes foreground)
//! 2. Bounding box of all foreground
//! 3. Translate so the box center lands on the image center, white border
//! 4. Inpaint very bright pixels (dilated once) with Telea, radius 3
//!
//! A page without any foreground passes through untouched.

use image::{Rgb, RgbImage};

use crate::imaging::{
    dilate_3x3, foreground_bounds, inpaint_telea, otsu_level, threshold_binary,
    threshold_binary_inv, to_gray, translate, ImagingResult,
};

/// Gray level above which a shifted pixel is considered border/background
pub const BRIGHT_LEVEL: u8 = 250;

/// Inpainting neighbourhood radius in pixels
pub const INPAINT_RADIUS: u32 = 3;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Shift that moves the foreground center to the image center
///
/// `None` when the page has no foreground.
pub fn centering_shift(image: &RgbImage) -> Option<(i64, i64)> {
    let gray = to_gray(image);
    let level = otsu_level(&gray);
    let binary = threshold_binary_inv(&gray, level);
    let bounds = foreground_bounds(&binary)?;

    let (text_x, text_y) = bounds.center();
    let center_x = image.width() as i64 / 2;
    let center_y = image.height() as i64 / 2;
    let (dx, dy) = (center_x - text_x, center_y - text_y);

    tracing::debug!(
        otsu_level = level,
        image_center = ?(center_x, center_y),
        text_center = ?(text_x, text_y),
        dx,
        dy,
        "Computed page centering shift"
    );

    Some((dx, dy))
}

/// Preprocess one rasterized page
///
/// Returns the input unchanged when `enabled` is false or when no
/// foreground is detected.
pub fn preprocess_page(image: RgbImage, enabled: bool) -> ImagingResult<RgbImage> {
    if !enabled {
        return Ok(image);
    }

    let Some((dx, dy)) = centering_shift(&image) else {
        tracing::debug!("No foreground detected, page left unchanged");
        return Ok(image);
    };

    let shifted = translate(&image, dx, dy, WHITE);
    let mask = dilate_3x3(&threshold_binary(&to_gray(&shifted), BRIGHT_LEVEL));

    inpaint_telea(&shifted, &mask, INPAINT_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::fill_rect;

    const PAPER: Rgb<u8> = Rgb([200, 200, 200]);

    fn page_with_block(width: u32, height: u32, x: i64, y: i64, size: i64) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, PAPER);
        fill_rect(&mut img, (x, y), (x + size - 1, y + size - 1), Rgb([20, 20, 20]));
        img
    }

    #[test]
    fn test_disabled_is_identity() {
        let img = page_with_block(40, 40, 2, 2, 5);
        assert_eq!(preprocess_page(img.clone(), false).unwrap(), img);
    }

    #[test]
    fn test_all_white_page_is_identity() {
        let img = RgbImage::from_pixel(60, 80, WHITE);
        assert_eq!(preprocess_page(img.clone(), true).unwrap(), img);
    }

    #[test]
    fn test_centering_shift() {
        // block spans 4..=13, center 4 + 10 / 2 = 9
        let img = page_with_block(60, 40, 4, 4, 10);
        assert_eq!(centering_shift(&img), Some((21, 11)));
    }

    #[test]
    fn test_preprocess_moves_block_to_center() {
        let img = page_with_block(60, 40, 4, 4, 10);
        let out = preprocess_page(img, true).unwrap();

        assert_eq!(out.dimensions(), (60, 40));
        // block now spans 25..=34 x 15..=24
        assert_eq!(*out.get_pixel(30, 20), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(25, 15), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(34, 24), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(24, 20), PAPER);
    }

    #[test]
    fn test_preprocess_inpaints_exposed_border() {
        let img = page_with_block(60, 40, 4, 4, 10);
        let out = preprocess_page(img, true).unwrap();

        // columns 0..21 and rows 0..11 were exposed as white by the shift
        assert_eq!(*out.get_pixel(0, 0), PAPER);
        assert_eq!(*out.get_pixel(10, 30), PAPER);
        assert_eq!(*out.get_pixel(50, 5), PAPER);
        assert!(out.pixels().all(|p| *p != WHITE));
    }
}
