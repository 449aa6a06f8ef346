//! Drawing-layer compositing
//!
//! The drawing layer is an opaque RGB canvas. Ink is selected with a hard
//! color key: a canvas pixel counts as ink when every channel lies inside
//! an inclusive `[lower, upper]` range. Ink pixels replace the page pixel,
//! everything else shows the page. No pixel is ever blended.

use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};

use crate::imaging::{ensure_same_dimensions, ImagingResult};

/// Lower bound of the ink color key
pub const INK_LOWER: Rgb<u8> = Rgb([0, 0, 0]);
/// Upper bound of the ink color key
pub const INK_UPPER: Rgb<u8> = Rgb([1, 1, 1]);

/// Foreground/background split of a page and its drawing layer
#[derive(Debug, Clone)]
pub struct Extraction {
    /// 255 where the canvas holds ink
    pub mask: GrayImage,
    /// Canvas pixels under the mask, zero elsewhere
    pub foreground: RgbImage,
    /// Page pixels outside the mask, zero elsewhere
    pub background: RgbImage,
}

impl Extraction {
    /// Sum both parts; supports are disjoint so this is a per-pixel select
    pub fn merge(&self) -> RgbImage {
        RgbImage::from_fn(self.mask.width(), self.mask.height(), |x, y| {
            let fg = self.foreground.get_pixel(x, y).0;
            let bg = self.background.get_pixel(x, y).0;
            Rgb([
                fg[0].saturating_add(bg[0]),
                fg[1].saturating_add(bg[1]),
                fg[2].saturating_add(bg[2]),
            ])
        })
    }
}

/// 255 where every channel lies within `[lower, upper]`, 0 elsewhere
pub fn in_range(image: &RgbImage, lower: Rgb<u8>, upper: Rgb<u8>) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y).0;
        let inside = (0..3).all(|c| pixel[c] >= lower.0[c] && pixel[c] <= upper.0[c]);
        Luma([if inside { 255 } else { 0 }])
    })
}

/// Split canvas and page by the color key
pub fn color_extraction(
    canvas: &RgbImage,
    page: &RgbImage,
    lower: Rgb<u8>,
    upper: Rgb<u8>,
) -> ImagingResult<Extraction> {
    ensure_same_dimensions(page.dimensions(), canvas.dimensions())?;

    let mask = in_range(canvas, lower, upper);

    // Canvas with the key as its alpha channel
    let keyed = RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b] = canvas.get_pixel(x, y).0;
        image::Rgba([r, g, b, mask.get_pixel(x, y).0[0]])
    });

    let foreground = RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, a] = keyed.get_pixel(x, y).0;
        if a > 0 {
            Rgb([r, g, b])
        } else {
            Rgb([0, 0, 0])
        }
    });

    let background = RgbImage::from_fn(page.width(), page.height(), |x, y| {
        if keyed.get_pixel(x, y).0[3] > 0 {
            Rgb([0, 0, 0])
        } else {
            *page.get_pixel(x, y)
        }
    });

    Ok(Extraction {
        mask,
        foreground,
        background,
    })
}

/// Live composite of a page raster and its drawing layer
pub fn composite_page(page: &RgbImage, canvas: &RgbImage) -> ImagingResult<RgbImage> {
    Ok(color_extraction(canvas, page, INK_LOWER, INK_UPPER)?.merge())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::fill_circle;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn page(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]))
    }

    #[test]
    fn test_dimensions_preserved() {
        for (w, h) in [(1, 1), (17, 5), (64, 48)] {
            let canvas = RgbImage::from_pixel(w, h, WHITE);
            let out = composite_page(&page(w, h), &canvas).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_blank_canvas_shows_page() {
        let base = page(20, 10);
        let canvas = RgbImage::from_pixel(20, 10, WHITE);

        assert_eq!(composite_page(&base, &canvas).unwrap(), base);
    }

    #[test]
    fn test_ink_overrides_page() {
        let base = page(20, 20);
        let mut canvas = RgbImage::from_pixel(20, 20, WHITE);
        fill_circle(&mut canvas, 10, 10, 3, Rgb([0, 0, 0]));

        let out = composite_page(&base, &canvas).unwrap();
        assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(13, 10), Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(15, 10), base.get_pixel(15, 10));
    }

    #[test]
    fn test_key_is_inclusive_and_tight() {
        let base = RgbImage::from_pixel(4, 1, Rgb([200, 100, 50]));
        let mut canvas = RgbImage::from_pixel(4, 1, WHITE);
        canvas.put_pixel(0, 0, Rgb([1, 1, 1]));
        canvas.put_pixel(1, 0, Rgb([0, 1, 0]));
        canvas.put_pixel(2, 0, Rgb([2, 0, 0]));
        canvas.put_pixel(3, 0, Rgb([10, 10, 10]));

        let extraction = color_extraction(&canvas, &base, INK_LOWER, INK_UPPER).unwrap();
        let mask: Vec<u8> = extraction.mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(mask, vec![255, 255, 0, 0]);

        let out = extraction.merge();
        assert_eq!(*out.get_pixel(0, 0), Rgb([1, 1, 1]));
        assert_eq!(*out.get_pixel(2, 0), Rgb([200, 100, 50]));
        assert_eq!(*out.get_pixel(3, 0), Rgb([200, 100, 50]));
    }

    #[test]
    fn test_supports_are_disjoint() {
        let base = page(16, 16);
        let mut canvas = RgbImage::from_pixel(16, 16, WHITE);
        fill_circle(&mut canvas, 4, 4, 2, Rgb([0, 0, 0]));

        let extraction = color_extraction(&canvas, &base, INK_LOWER, INK_UPPER).unwrap();
        for (x, y, m) in extraction.mask.enumerate_pixels() {
            if m.0[0] > 0 {
                assert_eq!(*extraction.background.get_pixel(x, y), Rgb([0, 0, 0]));
            } else {
                assert_eq!(*extraction.foreground.get_pixel(x, y), Rgb([0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let canvas = RgbImage::from_pixel(10, 10, WHITE);
        assert!(composite_page(&page(10, 11), &canvas).is_err());
    }
}
