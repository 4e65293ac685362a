//! Fletch Core Types and Definitions
//!
//! This crate provides the foundational types for drawing connector arrows
//! over laid-out documents. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and anchors ([`geometry`] module)
//! - **Colors**: CSS colors and theme-aware color tokens ([`color`] module)
//! - **Draw**: Stroke and arrow definitions ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
