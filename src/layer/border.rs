//! Thin inset highlight border.

use super::draw::{Surface, composite_atop};
use super::mask::RoundedMaskConfig;
use super::{ColorStop, CornerRadius, LayerEffect, RenderContext};
use crate::error::Result;

/// Configuration for the highlight border.
///
/// A rounded-rectangle outline inset by `size / 32`, concentric with the
/// icon outline.
///
/// # Consumed Properties
///
/// - [`CornerRadius`]: if set by the mask layer the outline follows it;
///   otherwise the default mask ratio is assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderConfig {
    pub color: ColorStop,

    /// Opacity of the outline (0-255). Kept low so it reads as a sheen.
    pub alpha: u8,
}

impl BorderConfig {
    pub fn new(color: ColorStop, alpha: u8) -> Self {
        Self { color, alpha }
    }
}

impl LayerEffect for BorderConfig {
    const NAME: &'static str = "border";

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let size = ctx.size;
        let inset = (size / 32) as f32;
        let width = (size / 256).max(1) as f32;
        let corner = ctx
            .get::<CornerRadius>()
            .map(|r| r.0)
            .unwrap_or_else(|| RoundedMaskConfig::default().radius_for(size) as f32);

        let far = size as f32 - inset;
        let mut surface = Surface::new(size)?;
        surface.stroke_rounded_rect(
            (inset, inset, far, far),
            (corner - inset).max(0.0),
            width,
            self.color,
            self.alpha,
        );

        composite_atop(&mut ctx.image, &surface.into_image());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::GradientConfig;

    fn background(size: u32) -> RenderContext {
        let mut ctx = RenderContext::new(size);
        GradientConfig::solid(ColorStop::new(0, 0, 0))
            .transform(&mut ctx)
            .unwrap();
        ctx
    }

    #[test]
    fn outline_tints_the_inset_edge_only() {
        let mut ctx = background(256);
        BorderConfig::new(ColorStop::new(255, 255, 255), 255)
            .transform(&mut ctx)
            .unwrap();

        // inset 8, width 1: the stroke spans 7.5..8.5
        assert!(ctx.image.get_pixel(128, 7)[0] > 0 || ctx.image.get_pixel(128, 8)[0] > 0);
        assert_eq!(ctx.image.get_pixel(128, 128).0, [0, 0, 0, 255]);
        assert_eq!(ctx.image.get_pixel(128, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn follows_corner_radius_from_context() {
        let border = BorderConfig::new(ColorStop::new(255, 255, 255), 255);

        let mut square = background(256);
        square.set(CornerRadius(8.0));
        border.transform(&mut square).unwrap();
        // radius 0 after inset: the outline reaches into the corner
        assert!(square.image.get_pixel(8, 8)[0] > 0);

        let mut rounded = background(256);
        border.transform(&mut rounded).unwrap();
        assert_eq!(rounded.image.get_pixel(8, 8).0, [0, 0, 0, 255]);
    }

    #[test]
    fn faint_alpha_keeps_border_subtle() {
        let mut ctx = background(512);
        BorderConfig::new(ColorStop::new(255, 255, 255), 30)
            .transform(&mut ctx)
            .unwrap();
        let brightest = ctx.image.pixels().map(|p| p[0]).max().unwrap();
        assert!(brightest > 0 && brightest <= 31, "brightest {brightest}");
    }
}
