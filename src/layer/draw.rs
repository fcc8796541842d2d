//! Drawing helpers shared by the decorative layers.
//!
//! Shapes are rasterized anti-aliased with tiny-skia (re-exported by resvg)
//! onto a transparent [`Pixmap`], converted to an [`RgbaImage`] and then
//! composited onto the icon.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    Color, FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::error::{Error, Result};
use crate::layer::background::ColorStop;

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// A transparent drawing surface the size of the icon.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocates a transparent `size × size` surface.
    pub fn new(size: u32) -> Result<Self> {
        let pixmap = Pixmap::new(size, size).ok_or(Error::Surface(size))?;
        Ok(Self { pixmap })
    }

    /// Fills a circle. Degenerate radii draw nothing.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: ColorStop, alpha: u8) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill(&path, color, alpha);
        }
    }

    /// Strokes a straight line with butt caps.
    pub fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: ColorStop,
        alpha: u8,
    ) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            self.stroke(&path, width, LineCap::Butt, color, alpha);
        }
    }

    /// Strokes the outline of a rounded rectangle.
    pub fn stroke_rounded_rect(
        &mut self,
        rect: (f32, f32, f32, f32),
        radius: f32,
        width: f32,
        color: ColorStop,
        alpha: u8,
    ) {
        if let Some(path) = rounded_rect_path(rect, radius) {
            self.stroke(&path, width, LineCap::Butt, color, alpha);
        }
    }

    /// Converts the surface to a straight-alpha RGBA image.
    pub fn into_image(self) -> RgbaImage {
        pixmap_to_rgba_image(&self.pixmap)
    }

    fn fill(&mut self, path: &Path, color: ColorStop, alpha: u8) {
        let paint = paint_for(color, alpha);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke(&mut self, path: &Path, width: f32, cap: LineCap, color: ColorStop, alpha: u8) {
        let paint = paint_for(color, alpha);
        let stroke = Stroke {
            width,
            line_cap: cap,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }
}

fn paint_for(color: ColorStop, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(color.red(), color.green(), color.blue(), alpha));
    paint.anti_alias = true;
    paint
}

/// Builds a rounded rectangle path from `(left, top, right, bottom)`.
///
/// The radius is clamped to half the shorter side. Returns `None` for empty
/// rectangles.
pub fn rounded_rect_path(rect: (f32, f32, f32, f32), radius: f32) -> Option<Path> {
    let (left, top, right, bottom) = rect;
    let (width, height) = (right - left, bottom - top);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

/// Converts a tiny-skia pixmap (premultiplied) to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `src` onto `dest` inside the existing shape of `dest`.
///
/// Source-atop: colours blend as source-over, but the destination alpha is
/// kept, so anything drawn outside the rounded mask stays invisible. Both
/// images must have the same dimensions.
pub fn composite_atop(dest: &mut RgbaImage, src: &RgbaImage) {
    for (d, s) in dest.pixels_mut().zip(src.pixels()) {
        *d = blend_atop(*s, *d);
    }
}

/// Blends one straight-alpha pixel atop another.
fn blend_atop(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 || dst[3] == 0 {
        return dst;
    }
    let sa = src[3] as f32 / 255.0;
    let blend = |s: u8, d: u8| -> u8 { (s as f32 * sa + d as f32 * (1.0 - sa)).round() as u8 };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        dst[3],
    ])
}
