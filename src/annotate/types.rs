//! Annotation payload types

use serde::{Deserialize, Serialize};

/// Pixel coordinate, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<[i64; 2]> for Point {
    fn from([x, y]: [i64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// One freehand stroke as sampled by the client
pub type Stroke = Vec<Point>;

/// Text anchor, serialized as `{x, y}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x: i64,
    pub y: i64,
}

/// Highlight rectangle; corners `(x, y)` and `(x + width, y + height)` are
/// both covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl HighlightRect {
    /// Opposite corners of the covered area
    pub fn corners(&self) -> ((i64, i64), (i64, i64)) {
        (
            (self.x, self.y),
            (
                self.x.saturating_add(self.width),
                self.y.saturating_add(self.height),
            ),
        )
    }
}
