//! Layer infrastructure for procedural icon rendering.
//!
//! A procedural icon is drawn by an ordered pipeline of layers. Each layer
//! encapsulates a configuration and an enabled state, and receives the
//! [`RenderContext`] produced by the layers before it.
//!
//! # Architecture
//!
//! Each layer config implements [`LayerEffect`], which defines:
//! - How the layer draws itself into the context image
//! - What properties it emits for downstream layers
//!
//! Properties flow through the pipeline via [`RenderContext`], so the border
//! can follow the corner radius chosen by the mask without either layer
//! knowing about the other.

pub mod background;
pub mod border;
pub mod draw;
pub mod mask;
pub mod motif;
pub mod svg;

pub use background::{ColorStop, GradientConfig, GradientDirection};
pub use border::BorderConfig;
pub use mask::RoundedMaskConfig;
pub use motif::MotifConfig;
pub use svg::SvgSource;

use crate::error::Result;
use crate::icon::IconImage;
use image::RgbaImage;
use std::any::{Any, TypeId};
use std::collections::HashMap;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
///
/// Layers can read properties set by upstream layers and emit new properties
/// for downstream layers to consume.
///
/// # Example
///
/// ```ignore
/// // The mask emits the radius it used
/// ctx.set(CornerRadius(56.0));
///
/// // The border reads it back
/// if let Some(radius) = ctx.get::<CornerRadius>() {
///     // ...
/// }
/// ```
pub struct RenderContext {
    /// Edge length of the icon being drawn.
    pub size: u32,

    /// The image being built up by the pipeline.
    pub image: RgbaImage,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Creates a context holding a fully transparent `size × size` canvas.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            image: RgbaImage::new(size, size),
            properties: HashMap::new(),
        }
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    /// Finishes rendering and hands out the image as a @1x icon.
    pub fn into_icon(self) -> IconImage {
        IconImage::standard(self.image)
    }
}

// ============================================================================
// Common Properties
// ============================================================================

/// Corner radius, in pixels, of the rounded icon shape.
///
/// Emitted by the mask layer. Consumed by the border layer so the highlight
/// outline stays concentric with the icon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadius(pub f32);

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configurations that know how to apply themselves.
///
/// Each layer:
/// - Draws into the image in the render context
/// - Can read properties set by upstream layers
/// - Emits properties for downstream layers in a dedicated method
pub trait LayerEffect: Clone + PartialEq {
    /// Short name used in log output.
    const NAME: &'static str;

    /// Draw into the image in the render context.
    ///
    /// Implementations should read any needed properties from `ctx` and
    /// modify `ctx.image`. Property emission happens in [`emit`](Self::emit).
    fn transform(&self, ctx: &mut RenderContext) -> Result<()>;

    /// Emit properties for downstream layers to consume.
    ///
    /// Called after [`transform`](Self::transform). The default implementation
    /// emits nothing.
    fn emit(&self, _ctx: &mut RenderContext) {}
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A layer slot holding an optional configuration and an enabled flag.
///
/// Disabling a layer keeps its configuration, so it can be toggled back on
/// without being reconfigured.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<C: LayerEffect> {
    config: Option<C>,
    enabled: bool,
}

impl<C: LayerEffect> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            enabled: true,
        }
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Creates an enabled layer with the given configuration.
    pub fn with_config(config: C) -> Self {
        Self {
            config: Some(config),
            enabled: true,
        }
    }

    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns true if this layer is active (has config AND is enabled).
    pub fn is_active(&self) -> bool {
        self.enabled && self.config.is_some()
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns whether the layer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the layer is enabled.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Sets the configuration. Returns true if it changed.
    pub fn set_config(&mut self, config: Option<C>) -> bool {
        let changed = self.config != config;
        self.config = config;
        changed
    }

    /// Apply this layer to the render context.
    ///
    /// If the layer is not active, the context passes through unchanged.
    pub fn apply(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(config) = self.config.as_ref().filter(|_| self.enabled) else {
            log::trace!("layer {} skipped at {}px", C::NAME, ctx.size);
            return Ok(());
        };

        config.transform(ctx)?;
        config.emit(ctx);
        Ok(())
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The ordered set of layers that draws a procedural icon.
///
/// ```text
/// ┌────────────┐
/// │ Background │  gradient or solid fill
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │    Mask    │  rounded corners ── emits CornerRadius
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │   Motif    │  line, nodes, filler dots (clipped to the mask)
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │   Border   │  inset highlight ── consumes CornerRadius
/// └────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerPipeline {
    pub background: Layer<GradientConfig>,
    pub mask: Layer<RoundedMaskConfig>,
    pub motif: Layer<MotifConfig>,
    pub border: Layer<BorderConfig>,
}

impl LayerPipeline {
    /// Renders a `size × size` icon through every layer in order.
    ///
    /// The size must already be validated as non-zero.
    pub fn render(&self, size: u32) -> Result<IconImage> {
        let mut ctx = RenderContext::new(size);

        self.background.apply(&mut ctx)?;
        self.mask.apply(&mut ctx)?;
        self.motif.apply(&mut ctx)?;
        self.border.apply(&mut ctx)?;

        log::debug!("rendered procedural icon at {size}x{size}");
        Ok(ctx.into_icon())
    }
}
