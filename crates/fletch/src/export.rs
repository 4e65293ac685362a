//! Export backends.
//!
//! Each backend is a [`Surface`](crate::host::Surface) that records what the
//! renderer paints and can serialize it to a file format.

pub mod svg;
