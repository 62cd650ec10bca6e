//! Geometric primitives for drawing coordinates.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in drawing space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box
//! - [`SegmentVector`] - A directed segment reduced to start, length and direction cosines
//!
//! # Coordinate System
//!
//! Topolink uses a coordinate system consistent with SVG and screen space:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

use serde::Deserialize;

/// Tolerance used when comparing resolved coordinates.
pub const EPSILON: f32 = 1e-3;

/// A 2D point in drawing coordinate space.
///
/// # Examples
///
/// ```
/// # use topolink_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(13.0, 24.0);
///
/// assert_eq!(a.add_point(b), Point::new(23.0, 44.0));
/// assert_eq!(a.distance(b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of the point treated as a vector.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Returns `true` if both coordinates are within [`EPSILON`] of `other`.
    pub fn is_near(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }

    /// Rounds both coordinates to the nearest multiple of `step`.
    ///
    /// A non-positive step leaves the point unchanged.
    ///
    /// ```
    /// # use topolink_core::geometry::Point;
    /// let snapped = Point::new(13.0, 27.0).snap_to_grid(10.0);
    /// assert_eq!(snapped, Point::new(10.0, 30.0));
    /// ```
    pub fn snap_to_grid(self, step: f32) -> Self {
        if step <= 0.0 {
            return self;
        }
        Self {
            x: (self.x / step).round() * step,
            y: (self.y / step).round() * step,
        }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

impl From<[f32; 2]> for Size {
    fn from([width, height]: [f32; 2]) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle given by its minimum and maximum coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    ///
    /// ```
    /// # use topolink_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points([Point::new(5.0, 1.0), Point::new(-2.0, 8.0)]).unwrap();
    /// assert_eq!(bounds.min_x(), -2.0);
    /// assert_eq!(bounds.max_y(), 8.0);
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            let point_bounds = Self {
                min_x: p.x,
                min_y: p.y,
                max_x: p.x,
                max_y: p.y,
            };
            Some(match acc {
                Some(bounds) => bounds.merge(&point_bounds),
                None => point_bounds,
            })
        })
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds into the smallest bounds containing both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns `true` if the point lies inside or on the edge of the bounds.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x - EPSILON
            && point.x <= self.max_x + EPSILON
            && point.y >= self.min_y - EPSILON
            && point.y <= self.max_y + EPSILON
    }
}

/// A directed segment reduced to its start point, length and direction cosines.
///
/// Bundle attachments are resolved parametrically along such a segment, so
/// the cosines are computed once when either endpoint moves and then reused.
///
/// # Examples
///
/// ```
/// # use topolink_core::geometry::{Point, SegmentVector};
/// let segment = SegmentVector::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
///
/// assert_eq!(segment.length(), 100.0);
/// assert_eq!(segment.point_at(150.0), Point::new(100.0, 0.0)); // clamped
/// assert_eq!(segment.point_at(-5.0), Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentVector {
    start: Point,
    length: f32,
    cos: f32,
    sin: f32,
}

impl SegmentVector {
    /// Builds the vector for the segment `start -> end`.
    ///
    /// A zero-length segment points along +X so that projections stay finite.
    pub fn between(start: Point, end: Point) -> Self {
        let delta = end.sub_point(start);
        let length = delta.hypot();
        let (cos, sin) = if length > f32::EPSILON {
            (delta.x / length, delta.y / length)
        } else {
            (1.0, 0.0)
        };
        Self {
            start,
            length,
            cos,
            sin,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn cos(&self) -> f32 {
        self.cos
    }

    pub fn sin(&self) -> f32 {
        self.sin
    }

    /// Clamps a distance along the segment to `[0, length]`.
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(0.0, self.length)
    }

    /// Point at `distance` from the start, clamped to the segment.
    pub fn point_at(&self, distance: f32) -> Point {
        let d = self.clamp_distance(distance);
        self.start.add_point(Point::new(d * self.cos, d * self.sin))
    }

    /// Scalar projection of `delta` onto the segment direction.
    pub fn project(&self, delta: Point) -> f32 {
        delta.x * self.cos + delta.y * self.sin
    }

    /// Returns `true` if the segment runs along the X axis.
    pub fn is_horizontal(&self) -> bool {
        self.length > EPSILON && self.sin.abs() <= EPSILON
    }

    /// Returns `true` if the segment runs along the Y axis.
    pub fn is_vertical(&self) -> bool {
        self.length > EPSILON && self.cos.abs() <= EPSILON
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3.0, 4.0);

        assert_eq!(p.add_point(Point::new(1.0, 1.0)), Point::new(4.0, 5.0));
        assert_eq!(p.sub_point(Point::new(1.0, 1.0)), Point::new(2.0, 3.0));
        assert_eq!(p.scale(2.0), Point::new(6.0, 8.0));
        assert_eq!(p.midpoint(Point::new(5.0, 6.0)), Point::new(4.0, 5.0));
        assert_approx_eq!(f32, p.hypot(), 5.0);
    }

    #[test]
    fn test_point_with_axes() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.with_x(9.0), Point::new(9.0, 2.0));
        assert_eq!(p.with_y(9.0), Point::new(1.0, 9.0));
    }

    #[test]
    fn test_point_is_near() {
        let p = Point::new(10.0, 10.0);
        assert!(p.is_near(Point::new(10.0005, 9.9995)));
        assert!(!p.is_near(Point::new(10.1, 10.0)));
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(
            Point::new(14.0, 16.0).snap_to_grid(10.0),
            Point::new(10.0, 20.0)
        );
        assert_eq!(
            Point::new(14.0, 16.0).snap_to_grid(0.0),
            Point::new(14.0, 16.0)
        );
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));

        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(100.0, 50.0)));
        assert!(!bounds.contains(Point::new(100.5, 10.0)));
        assert!(!bounds.contains(Point::new(10.0, -1.0)));
    }

    #[test]
    fn test_bounds_center_and_expand() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 50.0), Size::new(20.0, 10.0));
        assert_eq!(bounds.center(), Point::new(50.0, 50.0));

        let grown = bounds.expand(5.0);
        assert_approx_eq!(f32, grown.width(), 30.0);
        assert_approx_eq!(f32, grown.height(), 20.0);
        assert_approx_eq!(f32, grown.min_x(), 35.0);
    }

    #[test]
    fn test_bounds_from_points_empty() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_segment_vector_diagonal() {
        let segment = SegmentVector::between(Point::new(0.0, 0.0), Point::new(30.0, 40.0));

        assert_approx_eq!(f32, segment.length(), 50.0);
        assert_approx_eq!(f32, segment.cos(), 0.6);
        assert_approx_eq!(f32, segment.sin(), 0.8);

        let mid = segment.point_at(25.0);
        assert_approx_eq!(f32, mid.x(), 15.0);
        assert_approx_eq!(f32, mid.y(), 20.0);
        assert!(!segment.is_horizontal());
        assert!(!segment.is_vertical());
    }

    #[test]
    fn test_segment_vector_orientation() {
        let horizontal = SegmentVector::between(Point::new(0.0, 5.0), Point::new(-10.0, 5.0));
        assert!(horizontal.is_horizontal());
        assert_approx_eq!(f32, horizontal.cos(), -1.0);

        let vertical = SegmentVector::between(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!(vertical.is_vertical());
        assert_approx_eq!(f32, vertical.project(Point::new(3.0, 4.0)), 4.0);
    }

    #[test]
    fn test_segment_vector_zero_length() {
        let segment = SegmentVector::between(Point::new(7.0, 7.0), Point::new(7.0, 7.0));

        assert_approx_eq!(f32, segment.length(), 0.0);
        assert_eq!(segment.point_at(10.0), Point::new(7.0, 7.0));
        assert!(!segment.is_horizontal());
        assert!(!segment.is_vertical());
    }
}
