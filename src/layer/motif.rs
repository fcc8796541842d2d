//! Decorative motif: a slanted connecting line with three nodes.

use super::draw::{Surface, composite_atop};
use super::{ColorStop, LayerEffect, RenderContext};
use crate::error::Result;

const LINE_ALPHA: u8 = 240;
const DOT_ALPHA: u8 = 200;

/// Configuration for the motif layer.
///
/// The line runs from the start node slightly above centre, through the
/// larger middle node at the centre, to the end node slightly below. All
/// measurements scale with the icon edge.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifConfig {
    /// Colour of the connecting line.
    pub line: ColorStop,

    /// Colour of the outer node rings and filler dots.
    pub ring: ColorStop,

    /// Inner colours of the start, middle and end nodes.
    pub accents: [ColorStop; 3],

    /// Draw a smaller accent circle inside each ring. When off, nodes are
    /// solid accent colour.
    pub layered: bool,

    /// Draw small dots halfway along each half of the line.
    pub filler_dots: bool,
}

/// Pixel geometry of the motif for one icon size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifGeometry {
    pub start: (f32, f32),
    pub middle: (f32, f32),
    pub end: (f32, f32),
    pub line_width: f32,
    pub node_radius: f32,
    pub dot_radius: f32,
}

impl MotifGeometry {
    /// Lays out the motif for a `size × size` icon.
    ///
    /// Positions snap to whole pixels the same way for every size, which
    /// keeps small renders crisp.
    pub fn for_size(size: u32) -> Self {
        let center = size / 2;
        let offset = size / 16;
        let start_x = (size as f64 * 0.15).floor() as u32;
        let end_x = (size as f64 * 0.85).floor() as u32;

        Self {
            start: (start_x as f32, center.saturating_sub(offset) as f32),
            middle: (center as f32, center as f32),
            end: (end_x as f32, (center + offset) as f32),
            line_width: (size / 32).max(3) as f32,
            node_radius: (size / 16).max(8) as f32,
            dot_radius: (size / 64).max(3) as f32,
        }
    }

    /// Midpoints of the two halves of the line, where filler dots go.
    pub fn dot_positions(&self) -> [(f32, f32); 2] {
        let mid = |a: (f32, f32), b: (f32, f32)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        [mid(self.start, self.middle), mid(self.middle, self.end)]
    }
}

impl LayerEffect for MotifConfig {
    const NAME: &'static str = "motif";

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let geo = MotifGeometry::for_size(ctx.size);
        let mut surface = Surface::new(ctx.size)?;

        surface.stroke_line(geo.start, geo.end, geo.line_width * 4.0, self.line, LINE_ALPHA);

        // (position, ring scale, inner scale)
        let nodes = [
            (geo.start, 1.0, 0.75),
            (geo.middle, 1.2, 0.9),
            (geo.end, 1.0, 0.75),
        ];
        for ((center, ring_scale, inner_scale), accent) in nodes.into_iter().zip(self.accents) {
            let ring_radius = (geo.node_radius * ring_scale).floor();
            if self.layered {
                let inner_radius = (geo.node_radius * inner_scale).floor();
                surface.fill_circle(center.0, center.1, ring_radius, self.ring, 255);
                surface.fill_circle(center.0, center.1, inner_radius, accent, 255);
            } else {
                surface.fill_circle(center.0, center.1, ring_radius, accent, 255);
            }
        }

        if self.filler_dots {
            for (x, y) in geo.dot_positions() {
                surface.fill_circle(x, y, geo.dot_radius, self.ring, DOT_ALPHA);
            }
        }

        composite_atop(&mut ctx.image, &surface.into_image());
        Ok(())
    }
}
