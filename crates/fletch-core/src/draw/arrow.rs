//! Straight connector arrows.
//!
//! An arrow is a straight shaft from a source point to a destination point
//! with a filled triangular head whose tip sits exactly on the destination.

use std::f32::consts::FRAC_PI_6;

use crate::geometry::Point;

/// Angle between the shaft and each side of the head.
pub const HEAD_HALF_ANGLE: f32 = FRAC_PI_6;

/// Visual parameters shared by every arrow of a diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowDefinition {
    line_width: f32,
    head_size: f32,
}

impl ArrowDefinition {
    /// Creates a definition with the given shaft width and head side length, in CSS pixels.
    pub fn new(line_width: f32, head_size: f32) -> Self {
        Self {
            line_width,
            head_size,
        }
    }

    /// Returns the shaft stroke width.
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Returns the distance from the tip to each trailing head vertex.
    pub fn head_size(&self) -> f32 {
        self.head_size
    }

    /// Computes the geometry of an arrow from `source` to `destination`.
    pub fn geometry(&self, source: Point, destination: Point) -> ArrowGeometry {
        ArrowGeometry::new(source, destination, self.head_size)
    }
}

impl Default for ArrowDefinition {
    fn default() -> Self {
        Self::new(2.0, 8.0)
    }
}

/// Resolved points of a single arrow.
///
/// # Examples
///
/// ```
/// use fletch_core::{draw::ArrowGeometry, geometry::Point};
///
/// let arrow = ArrowGeometry::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 8.0);
/// let [tip, left, right] = arrow.head();
/// assert_eq!(tip, Point::new(100.0, 0.0));
/// assert!((left.x() - (100.0 - 8.0 * 30f32.to_radians().cos())).abs() < 1e-4);
/// assert!((left.y() - 4.0).abs() < 1e-4);
/// assert!((right.y() + 4.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    source: Point,
    destination: Point,
    head: [Point; 3],
}

impl ArrowGeometry {
    /// Computes the shaft and head of an arrow.
    ///
    /// The head vertices trail the destination by `head_size`, at
    /// `angle - π/6` and `angle + π/6` measured from the reversed shaft
    /// direction, where `angle = atan2(dy, dx)`. A zero-length arrow keeps
    /// `angle = 0` and still gets a head.
    pub fn new(source: Point, destination: Point, head_size: f32) -> Self {
        let angle = source.angle_to(destination);
        let trailing = |offset: f32| {
            let theta = angle + offset;
            Point::new(
                destination.x() - head_size * theta.cos(),
                destination.y() - head_size * theta.sin(),
            )
        };

        Self {
            source,
            destination,
            head: [
                destination,
                trailing(-HEAD_HALF_ANGLE),
                trailing(HEAD_HALF_ANGLE),
            ],
        }
    }

    /// Start of the shaft.
    pub fn source(&self) -> Point {
        self.source
    }

    /// End of the shaft and tip of the head.
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Head triangle as `[tip, first trailing vertex, second trailing vertex]`.
    pub fn head(&self) -> [Point; 3] {
        self.head
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn assert_point(actual: Point, x: f32, y: f32) {
        assert!(
            approx_eq!(f32, actual.x(), x, epsilon = 1e-4)
                && approx_eq!(f32, actual.y(), y, epsilon = 1e-4),
            "expected ({x}, {y}), got {actual}"
        );
    }

    #[test]
    fn test_horizontal_arrow_head() {
        let arrow = ArrowGeometry::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 8.0);
        let [tip, first, second] = arrow.head();

        let back = 100.0 - 8.0 * HEAD_HALF_ANGLE.cos();
        let side = 8.0 * HEAD_HALF_ANGLE.sin();

        assert_point(tip, 100.0, 0.0);
        assert_point(first, back, side);
        assert_point(second, back, -side);
    }

    #[test]
    fn test_vertical_arrow_head_points_down() {
        let arrow = ArrowGeometry::new(Point::new(50.0, 10.0), Point::new(50.0, 90.0), 10.0);
        let [tip, first, second] = arrow.head();

        assert_point(tip, 50.0, 90.0);
        // Both trailing vertices sit above the tip, mirrored around the shaft.
        assert!(first.y() < 90.0 && second.y() < 90.0);
        assert!(approx_eq!(f32, first.y(), second.y(), epsilon = 1e-4));
        assert!(approx_eq!(f32, first.x() - 50.0, 50.0 - second.x(), epsilon = 1e-4));
    }

    #[test]
    fn test_head_vertices_are_head_size_from_tip() {
        let arrow = ArrowGeometry::new(Point::new(-20.0, 35.0), Point::new(140.0, -60.0), 12.0);
        let [tip, first, second] = arrow.head();

        for vertex in [first, second] {
            let distance = vertex.sub_point(tip);
            let length = distance.x().hypot(distance.y());
            assert!(approx_eq!(f32, length, 12.0, epsilon = 1e-3));
        }
    }

    #[test]
    fn test_zero_length_arrow() {
        let point = Point::new(5.0, 5.0);
        let arrow = ArrowGeometry::new(point, point, 8.0);
        let [tip, first, second] = arrow.head();

        assert_eq!(tip, point);
        assert_point(first, 5.0 - 8.0 * HEAD_HALF_ANGLE.cos(), 5.0 + 4.0);
        assert_point(second, 5.0 - 8.0 * HEAD_HALF_ANGLE.cos(), 5.0 - 4.0);
    }

    #[test]
    fn test_definition_geometry_uses_head_size() {
        let definition = ArrowDefinition::new(3.0, 6.0);
        assert_eq!(definition.line_width(), 3.0);

        let arrow = definition.geometry(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert_eq!(arrow.source(), Point::new(0.0, 0.0));
        assert_eq!(arrow.destination(), Point::new(0.0, 10.0));
        assert_point(arrow.head()[1], -3.0, 10.0 - 6.0 * HEAD_HALF_ANGLE.cos());
    }

    #[test]
    fn test_default_definition() {
        let definition = ArrowDefinition::default();
        assert_eq!(definition.line_width(), 2.0);
        assert_eq!(definition.head_size(), 8.0);
    }
}
