//! app-iconkit: application icon generation for desktop bundles
//!
//! This crate renders an application icon, either procedurally (gradient,
//! rounded mask, node motif) or from an SVG source, and packages it into the
//! PNG, ICO and ICNS assets desktop bundlers expect.
//!
//! # Example
//!
//! ```
//! use app_iconkit::{IconPalette, IconRenderer, ProceduralRenderer};
//!
//! let mut renderer = ProceduralRenderer::new(IconPalette::Vivid);
//!
//! // Configure layers directly through the pipeline
//! renderer.pipeline.border.set_enabled(false);
//!
//! let icon = renderer.render(256).unwrap();
//! assert_eq!(icon.dimensions().width, 256);
//! ```
//!
//! # Packaging
//!
//! [`Packager`] writes the full asset set described by an [`IconProfile`]:
//!
//! ```no_run
//! use app_iconkit::{IconProfile, PackageConfig, Packager, renderer_for};
//!
//! let profile = IconProfile::new().with_output_dir("src-tauri/icons");
//! let renderer = renderer_for(&profile)?;
//! let report = Packager::new(renderer.as_ref(), PackageConfig::from(&profile)).run()?;
//!
//! if !report.icns.is_built() {
//!     eprintln!("icon.icns was skipped: {:?}", report.icns);
//! }
//! # Ok::<(), app_iconkit::Error>(())
//! ```

mod error;
mod icon;
mod layer;
mod package;
mod profile;
mod renderer;

pub use error::{Error, Result};
pub use icon::{IconImage, IconSet, SizePx, check_size};
pub use layer::draw::Surface;
pub use layer::motif::MotifGeometry;
pub use layer::svg::SvgDocument;
pub use layer::{
    BorderConfig, ColorStop, CornerRadius, GradientConfig, GradientDirection, Layer, LayerEffect,
    LayerPipeline, MotifConfig, RenderContext, RoundedMaskConfig, SvgSource,
};
pub use package::{ICONSET_DIR, IcnsOutcome, PackageConfig, PackageReport, Packager};
pub use profile::{
    ICO_SIZES, IconPalette, IconProfile, LayerSettings, MACOS_SIZES, STANDARD_SIZES,
    STORE_LOGO_SIZE, SourceSettings,
};
pub use renderer::{Configurable, IconRenderer, ProceduralRenderer, SvgRenderer, renderer_for};
