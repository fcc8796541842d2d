//! Rounded-corner alpha mask.

use super::{CornerRadius, LayerEffect, RenderContext};
use crate::error::Result;

/// Default corner radius as a fraction of the icon edge.
pub const DEFAULT_CORNER_RATIO: f64 = 0.22;

/// Configuration for the rounded-rectangle mask.
///
/// Pixels whose centre lies outside the rounded bounds become fully
/// transparent. Corner pixels within one pixel inside the arc get a soft
/// falloff measured from the pixel centre.
///
/// # Emitted Properties
///
/// - [`CornerRadius`]: the radius in pixels, for layers that follow the
///   icon outline.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedMaskConfig {
    /// Corner radius as a fraction of the icon edge (0.0-0.5).
    pub corner_ratio: f64,
}

impl Default for RoundedMaskConfig {
    fn default() -> Self {
        Self {
            corner_ratio: DEFAULT_CORNER_RATIO,
        }
    }
}

impl RoundedMaskConfig {
    /// The ratio is clamped to 0.0-0.5.
    pub fn new(corner_ratio: f64) -> Self {
        Self {
            corner_ratio: corner_ratio.clamp(0.0, 0.5),
        }
    }

    /// Corner radius in whole pixels for an icon of the given edge.
    pub fn radius_for(&self, size: u32) -> u32 {
        (size as f64 * self.corner_ratio).floor() as u32
    }
}

impl LayerEffect for RoundedMaskConfig {
    const NAME: &'static str = "mask";

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let size = ctx.size as f32;
        let radius = self.radius_for(ctx.size) as f32;

        for (x, y, pixel) in ctx.image.enumerate_pixels_mut() {
            let coverage = coverage(x as f32 + 0.5, y as f32 + 0.5, size, radius);
            if coverage < 1.0 {
                pixel[3] = (pixel[3] as f32 * coverage).round() as u8;
            }
        }
        Ok(())
    }

    fn emit(&self, ctx: &mut RenderContext) {
        let radius = self.radius_for(ctx.size);
        ctx.set(CornerRadius(radius as f32));
    }
}

/// Distance of `(px, py)` from the nearest corner-arc centre of a
/// `size`-square with rounded corners of `radius`, or `None` when the point
/// lies beside a straight edge.
fn corner_distance(px: f32, py: f32, size: f32, radius: f32) -> Option<f32> {
    let dx = (radius - px).max(px - (size - radius)).max(0.0);
    let dy = (radius - py).max(py - (size - radius)).max(0.0);
    if dx == 0.0 || dy == 0.0 {
        return None;
    }
    Some((dx * dx + dy * dy).sqrt())
}

/// Fraction of a pixel centred at `(px, py)` inside a `size`-square with
/// rounded corners of `radius`.
///
/// The ramp lies entirely inside the arc: a centre on or beyond it gets zero.
fn coverage(px: f32, py: f32, size: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 1.0;
    }
    match corner_distance(px, py, size, radius) {
        Some(dist) => (radius - dist).clamp(0.0, 1.0),
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ColorStop, GradientConfig};

    fn masked(size: u32) -> RenderContext {
        let mut ctx = RenderContext::new(size);
        GradientConfig::solid(ColorStop::new(40, 40, 40))
            .transform(&mut ctx)
            .unwrap();
        let mask = RoundedMaskConfig::default();
        mask.transform(&mut ctx).unwrap();
        mask.emit(&mut ctx);
        ctx
    }

    #[test]
    fn radius_is_fraction_of_size() {
        let mask = RoundedMaskConfig::default();
        assert_eq!(mask.radius_for(16), 3);
        assert_eq!(mask.radius_for(100), 22);
        assert_eq!(mask.radius_for(1024), 225);
        assert_eq!(RoundedMaskConfig::new(0.9).corner_ratio, 0.5);
    }

    #[test]
    fn corners_are_transparent() {
        for size in [16, 32, 48, 128, 256] {
            let ctx = masked(size);
            let last = size - 1;
            for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
                assert_eq!(ctx.image.get_pixel(x, y)[3], 0, "corner ({x},{y}) at {size}px");
            }
        }
    }

    #[test]
    fn pixels_centred_outside_the_arc_are_transparent() {
        let sizes = (1..=64).chain([1024]);
        for size in sizes {
            let ctx = masked(size);
            let radius = RoundedMaskConfig::default().radius_for(size) as f32;
            if radius == 0.0 {
                continue;
            }
            for (x, y, pixel) in ctx.image.enumerate_pixels() {
                let centre = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some(dist) = corner_distance(centre.0, centre.1, size as f32, radius) {
                    if dist >= radius {
                        assert_eq!(pixel[3], 0, "pixel ({x},{y}) at {size}px");
                    }
                }
            }
        }
    }

    #[test]
    fn small_icon_corner_pixel_is_clear() {
        // Radius 2: the corner centre sits just outside the arc.
        for size in 10..=13 {
            let ctx = masked(size);
            assert_eq!(ctx.image.get_pixel(0, 0)[3], 0, "{size}px");
        }
    }

    #[test]
    fn interior_and_edge_midpoints_stay_opaque() {
        let ctx = masked(64);
        assert_eq!(ctx.image.get_pixel(32, 32)[3], 255);
        assert_eq!(ctx.image.get_pixel(32, 0)[3], 255);
        assert_eq!(ctx.image.get_pixel(0, 32)[3], 255);
        assert_eq!(ctx.image.get_pixel(63, 32)[3], 255);
    }

    #[test]
    fn mask_is_symmetric() {
        let ctx = masked(50);
        for y in 0..50 {
            for x in 0..50 {
                assert_eq!(
                    ctx.image.get_pixel(x, y)[3],
                    ctx.image.get_pixel(49 - x, 49 - y)[3]
                );
            }
        }
    }

    #[test]
    fn zero_ratio_keeps_square() {
        let mut ctx = RenderContext::new(8);
        GradientConfig::solid(ColorStop::new(1, 1, 1))
            .transform(&mut ctx)
            .unwrap();
        RoundedMaskConfig::new(0.0).transform(&mut ctx).unwrap();
        assert!(ctx.image.pixels().all(|p| p[3] == 255));
    }
}
