//! Annotation operations
//!
//! Pure mutations over page rasters and drawing layers. Strokes and erasures
//! only ever touch the drawing layer; text, highlights and inversion only
//! ever touch the base page raster. Composites are computed on read.

mod types;

pub use types::{HighlightRect, Point, Stroke, TextPosition};

use image::{Rgb, RgbImage};

use crate::imaging::{blend_rect, draw_text, fill_circle, invert};

/// Pen radius in pixels
pub const STROKE_RADIUS: i64 = 3;
/// Eraser radius in pixels, deliberately wider than the pen
pub const ERASE_RADIUS: i64 = 7;

/// Pen color; must fall inside the compositor's ink key
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);
/// Blank drawing-layer color
pub const BLANK: Rgb<u8> = Rgb([255, 255, 255]);

/// Stamped text color
pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
/// Pixel scale of the bitmap font
pub const TEXT_SCALE: u32 = 1;

/// Highlight fill (yellow)
pub const HIGHLIGHT_FILL: Rgb<u8> = Rgb([250, 250, 5]);
/// Weight of the existing page pixel in each highlight pass
pub const HIGHLIGHT_PAGE_WEIGHT: f32 = 0.85;
/// Weight of the fill in each highlight pass
pub const HIGHLIGHT_FILL_WEIGHT: f32 = 0.15;
/// Number of sequential blends per highlight
pub const HIGHLIGHT_PASSES: usize = 2;

/// A fresh, all-blank drawing layer
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BLANK)
}

fn stamp_points(canvas: &mut RgbImage, strokes: &[Stroke], radius: i64, color: Rgb<u8>) -> usize {
    let mut stamped = 0;
    for point in strokes.iter().flatten() {
        fill_circle(canvas, point.x, point.y, radius, color);
        stamped += 1;
    }
    stamped
}

/// Draw ink discs at every stroke point; returns the number of points
pub fn apply_strokes(canvas: &mut RgbImage, strokes: &[Stroke]) -> usize {
    stamp_points(canvas, strokes, STROKE_RADIUS, INK)
}

/// Paint blank discs at every stroke point; returns the number of points
pub fn apply_erase(canvas: &mut RgbImage, strokes: &[Stroke]) -> usize {
    stamp_points(canvas, strokes, ERASE_RADIUS, BLANK)
}

/// Burn `text` into the page with its baseline-left corner at `position`
pub fn stamp_text(page: &mut RgbImage, text: &str, position: TextPosition) {
    draw_text(page, text, position.x, position.y, TEXT_SCALE, TEXT_COLOR);
}

/// Tint a rectangle of the page yellow
///
/// Every pass blends the current pixels against the same filled overlay,
/// so the tint compounds rather than matching a single heavier blend.
pub fn highlight(page: &mut RgbImage, rect: HighlightRect) {
    let (a, b) = rect.corners();
    for _ in 0..HIGHLIGHT_PASSES {
        blend_rect(
            page,
            a,
            b,
            HIGHLIGHT_FILL,
            HIGHLIGHT_PAGE_WEIGHT,
            HIGHLIGHT_FILL_WEIGHT,
        );
    }
}

/// Night mode: bitwise inversion of the page
pub fn invert_page(page: &mut RgbImage) {
    invert(page);
}
