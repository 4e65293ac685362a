//! The seam between the renderer and the environment it draws in.
//!
//! A [`Host`] answers layout and style queries about a live document; a
//! [`Surface`] is the pixel-addressable drawing target it hands out. The
//! browser implementation lives in `web` (wasm32 only); the
//! [`LayoutSnapshot`](crate::snapshot::LayoutSnapshot) host serves static
//! layouts to the CLI and tests.

use fletch_core::{
    color::VariableLookup,
    draw::StrokeDefinition,
    geometry::{Bounds, Point, Size},
};

/// Layout, style and surface lookups provided by the host document.
///
/// Every query reflects the document at the time of the call; the renderer
/// never caches results across draws.
pub trait Host: VariableLookup {
    /// Drawing surface type handed out by [`Host::surface`].
    type Surface: Surface;

    /// Looks up the drawing surface with the given element id.
    fn surface(&self, id: &str) -> Option<Self::Surface>;

    /// Returns the viewport-relative bounding box of the element with the
    /// given id, in CSS pixels.
    fn bounds(&self, id: &str) -> Option<Bounds>;

    /// Returns the device pixel ratio, when the host knows it.
    fn device_pixel_ratio(&self) -> Option<f64>;
}

/// A canvas-like drawing target.
///
/// Coordinates passed to the drawing methods are CSS pixels; the surface
/// applies the scale set by [`Surface::set_scale`] to map them onto its
/// backing buffer.
pub trait Surface {
    /// Resizes the backing buffer, in device pixels. This resets any
    /// transform previously set.
    fn set_buffer_size(&mut self, width: u32, height: u32);

    /// Sets the displayed size of the surface, in CSS pixels.
    fn set_display_size(&mut self, size: Size);

    /// Replaces the current transform with a uniform scale.
    fn set_scale(&mut self, ratio: f64);

    /// Clears the whole backing buffer.
    fn clear(&mut self);

    /// Strokes a straight line.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeDefinition);

    /// Fills the closed polygon through `points` with a solid color.
    fn fill_polygon(&mut self, points: &[Point], color: &str);
}
