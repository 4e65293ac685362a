//! Geometric primitives for connector placement.
//!
//! This module provides the geometric types used to turn host layout boxes
//! into drawing-surface coordinates.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in CSS pixels
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Anchor`] - The attachment points an arrow can start from or end at
//!
//! # Coordinate System
//!
//! Fletch uses the coordinate system of the browser viewport and of a 2D
//! canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Layout boxes reported by the host are viewport-relative. Anchors are
//! always expressed relative to the top-left corner of the container the
//! drawing surface overlays.

use std::fmt;

/// A 2D point in CSS pixel space.
///
/// # Examples
///
/// ```
/// # use fletch_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let diff = p1.sub_point(p2);
/// assert_eq!(diff.x(), 5.0);
/// assert_eq!(diff.y(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
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

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the angle, in radians, of the direction from this point to `other`.
    ///
    /// The angle is measured with `atan2(dy, dx)`, so it lies in `(-π, π]`
    /// and grows clockwise on screen because the Y axis points down.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fletch_core::geometry::Point;
    /// let origin = Point::new(0.0, 0.0);
    /// assert_eq!(origin.angle_to(Point::new(10.0, 0.0)), 0.0);
    /// ```
    pub fn angle_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
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

    /// Returns the whole-pixel size needed to hold this size scaled by `ratio`.
    ///
    /// Each dimension is rounded up, so a backing buffer of this size always
    /// covers the scaled area. The product is taken in `f64`, matching the
    /// arithmetic browsers use for `devicePixelRatio`; an `f32` product can
    /// land on the wrong side of a whole pixel at zoom ratios such as 1.1 or
    /// 1.2. Negative or non-finite products clamp to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fletch_core::geometry::Size;
    /// let css = Size::new(300.5, 100.0);
    /// assert_eq!(css.to_device_pixels(2.0), (601, 200));
    /// assert_eq!(css.to_device_pixels(1.5), (451, 150));
    /// ```
    pub fn to_device_pixels(self, ratio: f64) -> (u32, u32) {
        (
            ceil_to_pixels(f64::from(self.width) * ratio),
            ceil_to_pixels(f64::from(self.height) * ratio),
        )
    }
}

fn ceil_to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        // Float-to-int `as` saturates at u32::MAX.
        value.ceil() as u32
    } else {
        0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates a new bounds from the `left`/`top`/`width`/`height` quadruple
    /// reported by layout queries.
    pub fn from_layout_box(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new_from_top_left(Point::new(left, top), Size::new(width, height))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Returns the requested anchor point of these bounds, in the same
    /// coordinate space as the bounds.
    pub fn anchor(self, anchor: Anchor) -> Point {
        let x = self.min_x + self.width() / 2.0;
        let y = match anchor {
            Anchor::Center => self.min_y + self.height() / 2.0,
            Anchor::BottomCenter => self.max_y,
            Anchor::TopCenter => self.min_y,
        };
        Point::new(x, y)
    }

    /// Returns the requested anchor point expressed relative to the top-left
    /// corner of `container`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fletch_core::geometry::{Anchor, Bounds};
    /// let container = Bounds::from_layout_box(80.0, 30.0, 400.0, 300.0);
    /// let element = Bounds::from_layout_box(100.0, 50.0, 40.0, 20.0);
    ///
    /// let bottom = element.anchor_within(container, Anchor::BottomCenter);
    /// assert_eq!((bottom.x(), bottom.y()), (40.0, 40.0));
    ///
    /// let top = element.anchor_within(container, Anchor::TopCenter);
    /// assert_eq!((top.x(), top.y()), (40.0, 20.0));
    /// ```
    pub fn anchor_within(self, container: Bounds, anchor: Anchor) -> Point {
        self.anchor(anchor).sub_point(container.min_point())
    }
}

/// Attachment point on an element's bounding box.
///
/// Connections leave their source at [`Anchor::BottomCenter`] and enter
/// their target at [`Anchor::TopCenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Center of the box.
    Center,
    /// Horizontal center of the bottom edge.
    BottomCenter,
    /// Horizontal center of the top edge.
    TopCenter,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Center => "center",
            Self::BottomCenter => "bottom-center",
            Self::TopCenter => "top-center",
        };
        f.write_str(name)
    }
}
