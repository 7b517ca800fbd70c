use std::fmt;

use crate::global_constants::LOG_TAG_POINT;

/// Absolute screen coordinates in the capture source's device-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn at_coordinates(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Top-left corner and size of the rectangle spanned by two opposite corners.
    pub fn span_with(&self, other: &Point) -> (Point, u32, u32) {
        let top_left = Point::at_coordinates(self.x.min(other.x), self.y.min(other.y));
        let width = self.x.abs_diff(other.x);
        let height = self.y.abs_diff(other.y);

        log::debug!(
            "{} span ({}, {}) -> ({}, {}) = {}x{} at {}",
            LOG_TAG_POINT,
            self.x,
            self.y,
            other.x,
            other.y,
            width,
            height,
            top_left
        );

        (top_left, width, height)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}
