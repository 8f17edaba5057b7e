//! Cairo-based rendering functions for shapes.

use super::color::{Color, WHITE};
use super::shape::{Shape, ShapeKind};
use super::surface::Surface;
use anyhow::{Context as _, Result};
use std::fs::File;
use std::path::Path;

/// Stroke width used for outlines and lines.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Renders all shapes in a collection to a Cairo context.
///
/// Shapes are drawn in the order they appear (first shape = bottom layer).
pub fn render_shapes(ctx: &cairo::Context, shapes: &[Shape], line_width: f64) {
    for shape in shapes {
        render_shape(ctx, shape, line_width);
    }
}

/// Renders a single shape to a Cairo context.
///
/// Rectangles and ellipses are normalised from their two corner points, so
/// dragging in any direction produces the same figure.
pub fn render_shape(ctx: &cairo::Context, shape: &Shape, line_width: f64) {
    set_source(ctx, shape.color);
    ctx.set_line_width(line_width);

    match shape.kind {
        ShapeKind::Line => render_line(ctx, shape),
        ShapeKind::Rectangle => render_rect(ctx, shape),
        ShapeKind::Ellipse => render_ellipse(ctx, shape),
    }
}

fn set_source(ctx: &cairo::Context, color: Color) {
    let (r, g, b) = color.to_unit();
    ctx.set_source_rgb(r, g, b);
}

/// Render a straight line
fn render_line(ctx: &cairo::Context, shape: &Shape) {
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.move_to(shape.x1, shape.y1);
    ctx.line_to(shape.x2, shape.y2);
    let _ = ctx.stroke();
}

/// Render a rectangle, outlined or filled
fn render_rect(ctx: &cairo::Context, shape: &Shape) {
    let bounds = shape.bounds();
    ctx.set_line_join(cairo::LineJoin::Miter);
    ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
    finish_path(ctx, shape.renders_filled());
}

/// Render an ellipse using Cairo's arc with scaling
fn render_ellipse(ctx: &cairo::Context, shape: &Shape) {
    let bounds = shape.bounds();
    if bounds.is_degenerate() {
        return;
    }
    let (cx, cy) = bounds.center();

    ctx.save().ok();
    ctx.translate(cx, cy);
    ctx.scale(bounds.width / 2.0, bounds.height / 2.0);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();

    finish_path(ctx, shape.renders_filled());
}

fn finish_path(ctx: &cairo::Context, filled: bool) {
    if filled {
        let _ = ctx.fill();
    } else {
        let _ = ctx.stroke();
    }
}

/// Raster [`Surface`] backed by a Cairo image surface.
pub struct CairoSurface {
    surface: cairo::ImageSurface,
    ctx: cairo::Context,
    background: Color,
    line_width: f64,
}

impl CairoSurface {
    /// Creates a white canvas of the given pixel size.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .context("failed to create cairo image surface")?;
        let ctx = cairo::Context::new(&surface).context("failed to create cairo context")?;
        ctx.set_antialias(cairo::Antialias::Best);

        let mut canvas = Self {
            surface,
            ctx,
            background: WHITE,
            line_width: DEFAULT_LINE_WIDTH,
        };
        canvas.clear();
        Ok(canvas)
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width.max(0.1);
        self
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Reads back one pixel as RGB, for inspection and tests.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let stride = self.surface.stride() as usize;
        let offset = y as usize * stride + x as usize * 4;
        let mut pixel = None;
        // The context keeps a reference to the surface, so read through with_data.
        self.surface
            .with_data(|data| {
                // ARgb32 is a native-endian u32 per pixel.
                let px = u32::from_ne_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
                pixel = Some(Color::new((px >> 16) as u8, (px >> 8) as u8, px as u8));
            })
            .ok()?;
        pixel
    }

    /// Writes the current canvas as a PNG file.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.surface
            .write_to_png(&mut file)
            .with_context(|| format!("failed to encode PNG {}", path.display()))?;
        Ok(())
    }
}

impl Surface for CairoSurface {
    fn draw(&mut self, shape: &Shape) {
        render_shape(&self.ctx, shape, self.line_width);
    }

    fn clear(&mut self) {
        set_source(&self.ctx, self.background);
        let _ = self.ctx.paint();
    }
}
