//! Error type shared by the renderers and the packager.

use std::path::PathBuf;

/// Errors that abort icon generation.
///
/// A missing or failing platform icon compiler is not an error: the `.icns`
/// step reports it through [`IcnsOutcome`](crate::IcnsOutcome) and packaging
/// carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested edge length was zero.
    #[error("invalid icon size {0}: size must be a positive number of pixels")]
    InvalidSize(u32),

    /// No standard sizes were configured, so there is nothing to derive the
    /// other assets from.
    #[error("no icon sizes configured")]
    NoSizes,

    /// The SVG source file does not exist.
    #[error("SVG source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The SVG source could not be parsed.
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// A pixmap of the requested size could not be allocated.
    #[error("cannot allocate a {0}x{0} drawing surface")]
    Surface(u32),

    /// Encoding or decoding a raster image failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// The configuration profile could not be parsed.
    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
