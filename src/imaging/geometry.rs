//! Geometric transforms

use image::{Rgb, RgbImage};

/// Shift an image by an integer offset
///
/// Pixel `(x, y)` of the output is source pixel `(x - dx, y - dy)`.
/// Exposed border pixels take `fill`.
pub fn translate(image: &RgbImage, dx: i64, dy: i64, fill: Rgb<u8>) -> RgbImage {
    let (width, height) = image.dimensions();

    RgbImage::from_fn(width, height, |x, y| {
        let sx = x as i64 - dx;
        let sy = y as i64 - dy;
        if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
            fill
        } else {
            *image.get_pixel(sx as u32, sy as u32)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_translate_moves_pixel() {
        let mut img = RgbImage::from_pixel(10, 10, WHITE);
        img.put_pixel(2, 3, Rgb([0, 0, 0]));

        let shifted = translate(&img, 4, -2, WHITE);

        assert_eq!(*shifted.get_pixel(6, 1), Rgb([0, 0, 0]));
        assert_eq!(*shifted.get_pixel(2, 3), WHITE);
    }

    #[test]
    fn test_translate_fills_border() {
        let img = RgbImage::from_pixel(6, 6, Rgb([10, 20, 30]));
        let shifted = translate(&img, 2, 0, WHITE);

        assert_eq!(*shifted.get_pixel(0, 0), WHITE);
        assert_eq!(*shifted.get_pixel(1, 5), WHITE);
        assert_eq!(*shifted.get_pixel(2, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_translate_zero_is_identity() {
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8, y as u8, 7]));
        assert_eq!(translate(&img, 0, 0, WHITE), img);
    }
}
