//! Icon renderers.
//!
//! Both renderers turn a pixel size into a fresh square RGBA image. They
//! hold only configuration, so a single renderer can be shared across
//! threads and called for many sizes.

use crate::error::Result;
use crate::icon::{IconImage, IconSet, check_size};
use crate::layer::svg::{SvgDocument, SvgSource};
use crate::layer::{Layer, LayerPipeline, RoundedMaskConfig};
use crate::profile::{IconPalette, IconProfile, LayerSettings};

// ============================================================================
// Traits
// ============================================================================

/// Produces a square icon image for any positive edge length.
pub trait IconRenderer {
    /// Renders a `size × size` RGBA icon.
    ///
    /// Fails with [`Error::InvalidSize`](crate::Error::InvalidSize) for zero.
    fn render(&self, size: u32) -> Result<IconImage>;

    /// Renders every size in order into an [`IconSet`].
    fn render_all(&self, sizes: &[u32]) -> Result<IconSet> {
        sizes
            .iter()
            .map(|&size| self.render(size))
            .collect::<Result<Vec<_>>>()
            .map(IconSet::from_images)
    }
}

/// Trait for types that can be configured from an [`IconProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &IconProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> IconProfile;
}

// ============================================================================
// ProceduralRenderer
// ============================================================================

/// Draws the icon from geometric primitives.
///
/// Access layers directly through the [`pipeline`](Self::pipeline) field to
/// adjust them.
///
/// # Layer Pipeline
///
/// 1. **Background** (`pipeline.background`) - gradient or solid fill
/// 2. **Mask** (`pipeline.mask`) - rounded corners
/// 3. **Motif** (`pipeline.motif`) - line, nodes and filler dots
/// 4. **Border** (`pipeline.border`) - faint inset outline
///
/// # Example
///
/// ```
/// use app_iconkit::{IconPalette, IconRenderer, ProceduralRenderer};
///
/// let mut renderer = ProceduralRenderer::new(IconPalette::Vivid);
/// renderer.pipeline.border.set_enabled(false);
///
/// let icon = renderer.render(128).unwrap();
/// assert_eq!(icon.edge(), 128);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProceduralRenderer {
    palette: IconPalette,

    /// The layer pipeline. Access layers directly to configure them.
    pub pipeline: LayerPipeline,
}

impl Default for ProceduralRenderer {
    fn default() -> Self {
        Self::new(IconPalette::default())
    }
}

impl ProceduralRenderer {
    /// Creates a renderer with every layer of the palette enabled.
    pub fn new(palette: IconPalette) -> Self {
        Self {
            palette,
            pipeline: LayerPipeline {
                background: Layer::with_config(palette.background()),
                mask: Layer::with_config(RoundedMaskConfig::default()),
                motif: Layer::with_config(palette.motif()),
                border: Layer::with_config(palette.border()),
            },
        }
    }

    /// Creates a renderer configured from a profile.
    pub fn from_profile(profile: &IconProfile) -> Self {
        let mut renderer = Self::new(profile.palette);
        renderer.apply_profile(profile);
        renderer
    }

    /// Returns the palette the layers were configured from.
    pub fn palette(&self) -> IconPalette {
        self.palette
    }
}

impl IconRenderer for ProceduralRenderer {
    fn render(&self, size: u32) -> Result<IconImage> {
        self.pipeline.render(check_size(size)?)
    }
}

impl Configurable for ProceduralRenderer {
    /// Resets every layer to the profile's palette, then applies the
    /// profile's layer toggles.
    fn apply_profile(&mut self, profile: &IconProfile) {
        let LayerSettings {
            motif,
            border,
            filler_dots,
            layered,
        } = profile.layers;

        *self = Self::new(profile.palette);

        let mut motif_config = profile.palette.motif();
        motif_config.filler_dots = filler_dots;
        motif_config.layered = layered;
        self.pipeline.motif.set_config(Some(motif_config));
        self.pipeline.motif.set_enabled(motif);
        self.pipeline.border.set_enabled(border);
    }

    fn export_profile(&self) -> IconProfile {
        let motif = self.pipeline.motif.config();
        let layers = LayerSettings {
            motif: self.pipeline.motif.is_active(),
            border: self.pipeline.border.is_active(),
            filler_dots: motif.is_some_and(|m| m.filler_dots),
            layered: motif.is_some_and(|m| m.layered),
        };
        IconProfile::new()
            .with_palette(self.palette)
            .with_layers(layers)
    }
}

// ============================================================================
// SvgRenderer
// ============================================================================

/// Rasterizes an SVG document at each requested size.
///
/// The document is parsed once when the renderer is built, so a missing or
/// malformed source is reported before any output is written.
#[derive(Debug)]
pub struct SvgRenderer {
    document: SvgDocument,
}

impl SvgRenderer {
    /// Loads and parses the source.
    pub fn new(source: &SvgSource) -> Result<Self> {
        let document = source.load()?;
        log::debug!("parsed SVG source {:?}", document);
        Ok(Self { document })
    }
}

impl IconRenderer for SvgRenderer {
    fn render(&self, size: u32) -> Result<IconImage> {
        self.document.render(size)
    }
}

/// Builds the renderer a profile asks for.
pub fn renderer_for(profile: &IconProfile) -> Result<Box<dyn IconRenderer>> {
    match &profile.source {
        Some(source) => {
            log::info!("rendering from SVG {}", source.svg_path.display());
            let renderer = SvgRenderer::new(&SvgSource::from_path(&source.svg_path))?;
            Ok(Box::new(renderer))
        }
        None => {
            log::info!("rendering procedural icon ({:?} palette)", profile.palette);
            Ok(Box::new(ProceduralRenderer::from_profile(profile)))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
