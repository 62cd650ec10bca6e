//! Preferred directions of connection points.
//!
//! A direction is an angle in degrees measured counter-clockwise from +X as
//! seen on screen, so `90` points up even though the Y axis grows downward.
//! The four axis directions get exact treatment during alignment; any other
//! angle is handled through its tangent.

use std::fmt;

use crate::geometry::Point;

/// Axis-aligned directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    East,
    North,
    West,
    South,
}

/// Preferred direction of a connection point, in degrees.
///
/// # Examples
///
/// ```
/// # use topolink_core::direction::{Direction, Heading};
/// assert_eq!(Direction::new(450.0).degrees(), 90.0);
/// assert_eq!(Direction::new(-90.0).heading(), Some(Heading::South));
/// assert_eq!(Direction::new(30.0).heading(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(f32);

impl Direction {
    /// Creates a direction, normalising the angle into `[0, 360)`.
    pub fn new(degrees: f32) -> Self {
        Self(degrees.rem_euclid(360.0))
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    /// Returns the axis heading for 0/90/180/270, `None` for any other angle.
    pub fn heading(self) -> Option<Heading> {
        match self.0 {
            d if d == 0.0 => Some(Heading::East),
            d if d == 90.0 => Some(Heading::North),
            d if d == 180.0 => Some(Heading::West),
            d if d == 270.0 => Some(Heading::South),
            _ => None,
        }
    }

    /// Unit vector in drawing coordinates (Y grows downward).
    pub fn unit(self) -> Point {
        match self.heading() {
            Some(Heading::East) => Point::new(1.0, 0.0),
            Some(Heading::North) => Point::new(0.0, -1.0),
            Some(Heading::West) => Point::new(-1.0, 0.0),
            Some(Heading::South) => Point::new(0.0, 1.0),
            None => {
                let radians = self.0.to_radians();
                Point::new(radians.cos(), -radians.sin())
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_normalisation() {
        assert_approx_eq!(f32, Direction::new(360.0).degrees(), 0.0);
        assert_approx_eq!(f32, Direction::new(-180.0).degrees(), 180.0);
        assert_approx_eq!(f32, Direction::new(725.0).degrees(), 5.0);
    }

    #[test]
    fn test_axis_units_are_exact() {
        assert_eq!(Direction::new(0.0).unit(), Point::new(1.0, 0.0));
        assert_eq!(Direction::new(90.0).unit(), Point::new(0.0, -1.0));
        assert_eq!(Direction::new(180.0).unit(), Point::new(-1.0, 0.0));
        assert_eq!(Direction::new(270.0).unit(), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_oblique_unit_points_up_right() {
        let unit = Direction::new(45.0).unit();
        assert!(unit.x() > 0.0);
        assert!(unit.y() < 0.0);
        assert_approx_eq!(f32, unit.hypot(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_display() {
        assert_eq!(Direction::new(90.0).to_string(), "90°");
    }
}
