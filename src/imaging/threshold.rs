//! Thresholding and foreground detection

use image::{GrayImage, Luma};

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// Center point, truncating
    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64 / 2,
            self.y as i64 + self.height as i64 / 2,
        )
    }
}

/// Otsu threshold level over the 256-bin histogram
///
/// Maximises the between-class variance. A uniform image has no separable
/// classes and yields level 0.
pub fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0;
    }

    let scale = 1.0 / total as f64;
    let mu: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum::<f64>()
        * scale;

    let epsilon = f32::EPSILON as f64;
    let mut mu1 = 0.0f64;
    let mut q1 = 0.0f64;
    let mut max_sigma = 0.0f64;
    let mut level = 0u8;

    for (i, &count) in histogram.iter().enumerate() {
        let p_i = count as f64 * scale;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < epsilon || q1.max(q2) > 1.0 - epsilon {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            level = i as u8;
        }
    }

    level
}

/// `src > level` becomes 255, everything else 0
pub fn threshold_binary(gray: &GrayImage, level: u8) -> GrayImage {
    map_pixels(gray, |v| if v > level { 255 } else { 0 })
}

/// `src > level` becomes 0, everything else 255
pub fn threshold_binary_inv(gray: &GrayImage, level: u8) -> GrayImage {
    map_pixels(gray, |v| if v > level { 0 } else { 255 })
}

/// Bounding box of every non-zero pixel
///
/// Equivalent to the bounding rectangle of the union of all external
/// contours of the mask. `None` when the mask is empty.
pub fn foreground_bounds(mask: &GrayImage) -> Option<Bounds> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    found.then(|| Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

fn map_pixels(gray: &GrayImage, f: impl Fn(u8) -> u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([f(gray.get_pixel(x, y).0[0])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bimodal(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        // left half dark, right half light
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([dark])
            } else {
                Luma([light])
            }
        })
    }

    #[test]
    fn test_otsu_uniform_is_zero() {
        let gray = GrayImage::from_pixel(10, 10, Luma([255]));
        assert_eq!(otsu_level(&gray), 0);
    }

    #[test]
    fn test_otsu_separates_bimodal() {
        let gray = bimodal(20, 4, 30, 220);
        let level = otsu_level(&gray);

        assert!(level >= 30 && level < 220, "level {} not between classes", level);

        let binary = threshold_binary_inv(&gray, level);
        assert_eq!(binary.get_pixel(0, 0).0[0], 255);
        assert_eq!(binary.get_pixel(19, 0).0[0], 0);
    }

    #[test]
    fn test_threshold_binary_is_strict() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([249 + x as u8]));
        let mask = threshold_binary(&gray, 250);

        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
        assert_eq!(mask.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn test_foreground_bounds() {
        let mut mask = GrayImage::new(50, 40);
        mask.put_pixel(10, 5, Luma([255]));
        mask.put_pixel(20, 30, Luma([255]));
        mask.put_pixel(15, 12, Luma([255]));

        let bounds = foreground_bounds(&mask).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                x: 10,
                y: 5,
                width: 11,
                height: 26
            }
        );
        assert_eq!(bounds.center(), (15, 18));
    }

    #[test]
    fn test_foreground_bounds_empty() {
        let mask = GrayImage::new(8, 8);
        assert!(foreground_bounds(&mask).is_none());
    }
}
