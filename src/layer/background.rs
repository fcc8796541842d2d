//! Background fill: a solid colour or a linear gradient.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use palette::{Mix, Srgb};
use serde::{Deserialize, Serialize};

use super::{LayerEffect, RenderContext};
use crate::error::Result;

// ============================================================================
// ColorStop
// ============================================================================

/// An sRGB colour used as a gradient endpoint or shape fill.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorStop([u8; 3]);

impl ColorStop {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue])
    }

    pub fn red(&self) -> u8 {
        self.0[0]
    }

    pub fn green(&self) -> u8 {
        self.0[1]
    }

    pub fn blue(&self) -> u8 {
        self.0[2]
    }

    /// Opaque pixel of this colour.
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }

    /// Interpolates towards `other` in sRGB; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: ColorStop, t: f32) -> ColorStop {
        let a: Srgb<f32> = Srgb::from(self.0).into_format();
        let b: Srgb<f32> = Srgb::from(other.0).into_format();
        let mixed: Srgb<u8> = a.mix(b, t.clamp(0.0, 1.0)).into_format();
        ColorStop::new(mixed.red, mixed.green, mixed.blue)
    }
}

impl fmt::Display for ColorStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for ColorStop {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rgb: Srgb<u8> = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid colour {s:?}: {e}"))?;
        Ok(ColorStop::new(rgb.red, rgb.green, rgb.blue))
    }
}

impl TryFrom<String> for ColorStop {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColorStop> for String {
    fn from(c: ColorStop) -> Self {
        c.to_string()
    }
}

// ============================================================================
// GradientConfig
// ============================================================================

/// Axis along which a gradient varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    /// Colour changes from left to right; each column is uniform.
    #[default]
    Horizontal,
    /// Colour changes from top to bottom; each row is uniform.
    Vertical,
}

/// Configuration for the background layer.
///
/// One stop is a solid fill. Two stops blend across the whole span; three
/// stops blend the first pair over the first half and the second pair over
/// the second half.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientConfig {
    pub stops: Vec<ColorStop>,
    pub direction: GradientDirection,
}

impl GradientConfig {
    /// A uniform fill.
    pub fn solid(color: ColorStop) -> Self {
        Self {
            stops: vec![color],
            direction: GradientDirection::Horizontal,
        }
    }

    /// A gradient through up to three stops.
    ///
    /// Stops past the third are ignored.
    pub fn linear(stops: &[ColorStop], direction: GradientDirection) -> Self {
        Self {
            stops: stops.iter().copied().take(3).collect(),
            direction,
        }
    }

    /// Colour at position `t` along the gradient axis.
    pub fn color_at(&self, t: f32) -> ColorStop {
        let t = t.clamp(0.0, 1.0);
        match self.stops.as_slice() {
            [] => ColorStop::new(0, 0, 0),
            [only] => *only,
            [from, to] => from.lerp(*to, t),
            [first, middle, last, ..] => {
                if t > 0.5 {
                    middle.lerp(*last, (t - 0.5) * 2.0)
                } else {
                    first.lerp(*middle, t * 2.0)
                }
            }
        }
    }
}

impl LayerEffect for GradientConfig {
    const NAME: &'static str = "background";

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let size = ctx.size as f32;
        let direction = self.direction;
        // One colour per scanline.
        let line_colors: Vec<_> = (0..ctx.size)
            .map(|i| self.color_at(i as f32 / size).to_rgba())
            .collect();

        for (x, y, pixel) in ctx.image.enumerate_pixels_mut() {
            let i = match direction {
                GradientDirection::Horizontal => x,
                GradientDirection::Vertical => y,
            };
            *pixel = line_colors[i as usize];
        }
        Ok(())
    }
}
