//! SVG export surface.
//!
//! [`SvgSurface`] records the primitives the renderer paints, in CSS pixel
//! coordinates, and serializes them as an SVG document whose view box is the
//! surface's display size. The backing-buffer size and scale are tracked so
//! callers can check them, but they do not affect the vector output.

use log::debug;
use svg::{
    Document,
    node::element::{Line, Polygon, Rectangle},
};

use fletch_core::{
    apply_stroke,
    color::Color,
    draw::StrokeDefinition,
    geometry::{Point, Size},
};

use crate::host::Surface;

/// A painted primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A stroked straight line.
    Line {
        from: Point,
        to: Point,
        stroke: StrokeDefinition,
    },
    /// A filled closed polygon.
    Polygon { points: Vec<Point>, color: String },
}

/// A [`Surface`] that records primitives and exports them to SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    buffer_size: (u32, u32),
    display_size: Size,
    scale: f64,
    primitives: Vec<Primitive>,
}

impl SvgSurface {
    /// Creates an empty surface with a zero-sized buffer and unit scale.
    pub fn new() -> Self {
        Self {
            buffer_size: (0, 0),
            display_size: Size::default(),
            scale: 1.0,
            primitives: Vec::new(),
        }
    }

    /// Returns the backing-buffer size in device pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer_size
    }

    /// Returns the displayed size in CSS pixels.
    pub fn display_size(&self) -> Size {
        self.display_size
    }

    /// Returns the current scale transform.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the primitives painted since the last clear, in paint order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Builds an SVG document from the recorded primitives.
    pub fn to_document(&self, background: Option<Color>) -> Document {
        let width = self.display_size.width();
        let height = self.display_size.height();

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height));

        if let Some(background) = background {
            document = document.add(
                Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("fill", &background)
                    .set("fill-opacity", background.alpha()),
            );
        }

        for primitive in &self.primitives {
            document = match primitive {
                Primitive::Line { from, to, stroke } => {
                    let line = Line::new()
                        .set("x1", from.x())
                        .set("y1", from.y())
                        .set("x2", to.x())
                        .set("y2", to.y());
                    document.add(apply_stroke!(line, stroke))
                }
                Primitive::Polygon { points, color } => document.add(
                    Polygon::new()
                        .set("points", points_attribute(points))
                        .set("fill", color.as_str()),
                ),
            };
        }

        document
    }

    /// Serializes the recorded primitives to an SVG string.
    pub fn render(&self, background: Option<Color>) -> String {
        debug!(primitives = self.primitives.len(); "Rendering SVG document");
        self.to_document(background).to_string()
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn points_attribute(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x(), point.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Surface for SvgSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer_size = (width, height);
        // Resizing a canvas buffer resets its transform.
        self.scale = 1.0;
    }

    fn set_display_size(&mut self, size: Size) {
        self.display_size = size;
    }

    fn set_scale(&mut self, ratio: f64) {
        self.scale = ratio;
    }

    fn clear(&mut self) {
        self.primitives.clear();
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeDefinition) {
        self.primitives.push(Primitive::Line {
            from,
            to,
            stroke: stroke.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: &str) {
        self.primitives.push(Primitive::Polygon {
            points: points.to_vec(),
            color: color.to_string(),
        });
    }
}
