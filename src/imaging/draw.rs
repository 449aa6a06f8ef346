//! Drawing primitives
//!
//! All shapes are clipped to the image; coordinates may lie outside it.

use image::{Rgb, RgbImage};

/// Fill a disc of `radius` centred on `(cx, cy)`
///
/// A pixel is covered when `dx² + dy² <= radius²`.
pub fn fill_circle(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    let (width, height) = image.dimensions();
    let r2 = radius * radius;

    let y0 = cy.saturating_sub(radius).max(0);
    let y1 = cy.saturating_add(radius).min(height as i64 - 1);
    let x0 = cx.saturating_sub(radius).max(0);
    let x1 = cx.saturating_add(radius).min(width as i64 - 1);

    for y in y0..=y1 {
        let dy = y - cy;
        for x in x0..=x1 {
            let dx = x - cx;
            if dx * dx + dy * dy <= r2 {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Clip the inclusive rectangle spanned by two corners to the image
///
/// Returns `(x0, y0, x1, y1)` inclusive, or `None` if nothing is visible.
pub fn clip_rect(
    image: &RgbImage,
    (ax, ay): (i64, i64),
    (bx, by): (i64, i64),
) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let x0 = ax.min(bx).max(0);
    let y0 = ay.min(by).max(0);
    let x1 = ax.max(bx).min(width as i64 - 1);
    let y1 = ay.max(by).min(height as i64 - 1);

    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Fill the inclusive rectangle spanned by two corners
pub fn fill_rect(image: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: Rgb<u8>) {
    let Some((x0, y0, x1, y1)) = clip_rect(image, a, b) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Blend `color` into the inclusive rectangle spanned by two corners
///
/// Each channel becomes `round(alpha * pixel + beta * color)`, saturated.
/// Pixels outside the rectangle are untouched.
pub fn blend_rect(
    image: &mut RgbImage,
    a: (i64, i64),
    b: (i64, i64),
    color: Rgb<u8>,
    alpha: f32,
    beta: f32,
) {
    let Some((x0, y0, x1, y1)) = clip_rect(image, a, b) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let pixel = image.get_pixel_mut(x, y);
            for (channel, overlay) in pixel.0.iter_mut().zip(color.0) {
                let value = *channel as f32 * alpha + overlay as f32 * beta;
                *channel = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Bitwise NOT of every channel
pub fn invert(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = !*channel;
        }
    }
}
