//! Shape primitives, colors, and the surfaces they are drawn on.
//!
//! This module defines the core drawing types:
//! - [`Color`]: 8-bit RGB color with predefined constants and hex form
//! - [`Shape`]: one line, rectangle or ellipse
//! - [`Surface`]: the rendering capability the history engine draws onto
//! - [`Frame`]: headless surface that records the visible shapes
//! - [`CairoSurface`]: raster surface for PNG export (feature `png`)

pub mod color;
pub mod frame;
#[cfg(feature = "png")]
pub mod render;
pub mod shape;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use frame::Frame;
#[cfg(feature = "png")]
pub use render::{CairoSurface, render_shape, render_shapes};
pub use shape::{Shape, ShapeKind};
pub use surface::Surface;

pub use color::{BLACK, BLUE, GREEN, LIME, ORANGE, PINK, RED, WHITE, YELLOW};
