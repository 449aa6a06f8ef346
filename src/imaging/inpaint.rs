//! Telea inpainting
//!
//! Fast-marching reconstruction of masked pixels (A. Telea, "An Image
//! Inpainting Technique Based on the Fast Marching Method", 2004).
//!
//! Pixels are processed in order of increasing distance `T` from the known
//! region. Each newly reached pixel is filled with a weighted mean of the
//! known pixels within `radius`, where the weight combines inverse cubic
//! distance, level-set proximity and alignment with `∇T`. The first-order
//! gradient correction term of the paper is not applied.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use image::{GrayImage, RgbImage};

use super::{ensure_same_dimensions, ImagingResult};

const KNOWN: u8 = 0;
const BAND: u8 = 1;
const INSIDE: u8 = 2;

const INF: f32 = 1.0e6;

/// Narrow-band entry, ordered as a min-heap on `t` then insertion order
#[derive(Debug, Clone, Copy)]
struct Candidate {
    t: f32,
    seq: u64,
    x: u32,
    y: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .t
            .total_cmp(&self.t)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Per-pixel state of the marching front
struct Field {
    width: u32,
    height: u32,
    flags: Vec<u8>,
    dist: Vec<f32>,
}

impl Field {
    fn from_mask(mask: &GrayImage) -> Self {
        let flags: Vec<u8> = mask
            .pixels()
            .map(|p| if p.0[0] != 0 { INSIDE } else { KNOWN })
            .collect();
        let dist = flags
            .iter()
            .map(|&f| if f == INSIDE { INF } else { 0.0 })
            .collect();

        Self {
            width: mask.width(),
            height: mask.height(),
            flags,
            dist,
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Out-of-image pixels behave as unreached
    fn flag(&self, x: i64, y: i64) -> u8 {
        self.index(x, y).map_or(INSIDE, |i| self.flags[i])
    }

    fn t(&self, x: i64, y: i64) -> f32 {
        self.index(x, y).map_or(INF, |i| self.dist[i])
    }

    fn set(&mut self, x: u32, y: u32, flag: u8, t: f32) {
        let i = y as usize * self.width as usize + x as usize;
        self.flags[i] = flag;
        self.dist[i] = t;
    }

    fn set_flag(&mut self, x: u32, y: u32, flag: u8) {
        let i = y as usize * self.width as usize + x as usize;
        self.flags[i] = flag;
    }

    /// Eikonal update from one horizontal and one vertical neighbour
    fn solve(&self, (x1, y1): (i64, i64), (x2, y2): (i64, i64)) -> f32 {
        let a11 = self.t(x1, y1);
        let a22 = self.t(x2, y2);
        let m12 = a11.min(a22);

        match (self.flag(x1, y1) != INSIDE, self.flag(x2, y2) != INSIDE) {
            (true, true) => {
                let diff = a11 - a22;
                if diff.abs() >= 1.0 {
                    1.0 + m12
                } else {
                    (a11 + a22 + (2.0 - diff * diff).sqrt()) * 0.5
                }
            }
            (true, false) => 1.0 + a11,
            (false, true) => 1.0 + a22,
            (false, false) => 1.0 + m12,
        }
    }

    fn arrival_time(&self, x: i64, y: i64) -> f32 {
        [
            self.solve((x, y - 1), (x - 1, y)),
            self.solve((x, y + 1), (x - 1, y)),
            self.solve((x, y - 1), (x + 1, y)),
            self.solve((x, y + 1), (x + 1, y)),
        ]
        .into_iter()
        .fold(INF, f32::min)
    }

    /// One-sided or central difference of `T` along one axis
    fn gradient_axis(&self, x: i64, y: i64, (sx, sy): (i64, i64)) -> f32 {
        let forward = self.flag(x + sx, y + sy) != INSIDE;
        let backward = self.flag(x - sx, y - sy) != INSIDE;

        match (forward, backward) {
            (true, true) => (self.t(x + sx, y + sy) - self.t(x - sx, y - sy)) * 0.5,
            (true, false) => self.t(x + sx, y + sy) - self.t(x, y),
            (false, true) => self.t(x, y) - self.t(x - sx, y - sy),
            (false, false) => 0.0,
        }
    }
}

/// Inpaint every pixel where `mask` is non-zero
///
/// A mask with no known boundary (empty, or covering the whole image)
/// leaves the image unchanged.
pub fn inpaint_telea(image: &RgbImage, mask: &GrayImage, radius: u32) -> ImagingResult<RgbImage> {
    ensure_same_dimensions(image.dimensions(), mask.dimensions())?;

    let mut out = image.clone();
    let mut field = Field::from_mask(mask);
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    // Initial band: known pixels 4-adjacent to the masked region
    for y in 0..field.height as i64 {
        for x in 0..field.width as i64 {
            if field.flag(x, y) != KNOWN {
                continue;
            }
            let touches_inside = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                .into_iter()
                .any(|(nx, ny)| field.index(nx, ny).is_some() && field.flag(nx, ny) == INSIDE);
            if touches_inside {
                field.set(x as u32, y as u32, BAND, 0.0);
                heap.push(Candidate {
                    t: 0.0,
                    seq,
                    x: x as u32,
                    y: y as u32,
                });
                seq += 1;
            }
        }
    }

    while let Some(Candidate { x, y, .. }) = heap.pop() {
        field.set_flag(x, y, KNOWN);
        let (cx, cy) = (x as i64, y as i64);

        for (nx, ny) in [(cx - 1, cy), (cx + 1, cy), (cx, cy - 1), (cx, cy + 1)] {
            if field.index(nx, ny).is_none() || field.flag(nx, ny) != INSIDE {
                continue;
            }

            let t = field.arrival_time(nx, ny);
            field.set(nx as u32, ny as u32, INSIDE, t);
            fill_pixel(&mut out, &field, nx, ny, radius as i64);
            field.set_flag(nx as u32, ny as u32, BAND);

            heap.push(Candidate {
                t,
                seq,
                x: nx as u32,
                y: ny as u32,
            });
            seq += 1;
        }
    }

    Ok(out)
}

fn fill_pixel(out: &mut RgbImage, field: &Field, x: i64, y: i64, radius: i64) {
    let grad_x = field.gradient_axis(x, y, (1, 0));
    let grad_y = field.gradient_axis(x, y, (0, 1));
    let t_here = field.t(x, y);
    let r2 = radius * radius;

    let mut acc = [0.0f32; 3];
    let mut total = 0.0f32;

    for ky in y - radius..=y + radius {
        for kx in x - radius..=x + radius {
            if field.index(kx, ky).is_none() || field.flag(kx, ky) == INSIDE {
                continue;
            }
            let (rx, ry) = ((x - kx) as f32, (y - ky) as f32);
            let len2 = rx * rx + ry * ry;
            if len2 == 0.0 || (x - kx).pow(2) + (y - ky).pow(2) > r2 {
                continue;
            }

            let dst = 1.0 / (len2 * len2.sqrt());
            let lev = 1.0 / (1.0 + (field.t(kx, ky) - t_here).abs());
            let mut dir = rx * grad_x + ry * grad_y;
            if dir.abs() <= 0.01 {
                dir = 1.0e-6;
            }
            let weight = (dst * lev * dir).abs();

            let pixel = out.get_pixel(kx as u32, ky as u32);
            for (a, &v) in acc.iter_mut().zip(pixel.0.iter()) {
                *a += weight * v as f32;
            }
            total += weight;
        }
    }

    if total > 0.0 {
        let pixel = out.get_pixel_mut(x as u32, y as u32);
        for (channel, a) in pixel.0.iter_mut().zip(acc) {
            *channel = (a / total).round().clamp(0.0, 255.0) as u8;
        }
    }
}
