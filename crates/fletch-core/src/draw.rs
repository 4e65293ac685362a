//! Drawing definitions shared by every rendering backend.
//!
//! - [`StrokeDefinition`] describes how a connector shaft is stroked.
//! - [`ArrowDefinition`] and [`ArrowGeometry`] describe the arrow itself.

mod arrow;
mod stroke;

pub use arrow::{ArrowDefinition, ArrowGeometry, HEAD_HALF_ANGLE};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin};
