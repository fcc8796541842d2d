//! SVG rasterization using resvg/usvg.
//!
//! Used by [`SvgRenderer`](crate::SvgRenderer) when the icon artwork comes
//! from a vector source instead of being drawn procedurally.

use std::path::{Path, PathBuf};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::draw::pixmap_to_rgba_image;
use crate::error::{Error, Result};
use crate::icon::{IconImage, check_size};

// ============================================================================
// SvgSource
// ============================================================================

/// A source for SVG data.
///
/// # Example
///
/// ```
/// use app_iconkit::SvgSource;
///
/// // From raw SVG
/// let raw = SvgSource::from_svg("<svg>...</svg>");
///
/// // From a file on disk
/// let file = SvgSource::from_path("icons/app.svg");
/// assert!(file.is_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Raw SVG markup string.
    Raw(String),

    /// Path to an `.svg` file, read when the document is loaded.
    File(PathBuf),
}

impl SvgSource {
    /// Creates a source from raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Returns `true` if this is a file source.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns `true` if this is a raw SVG source.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Reads and parses the document.
    ///
    /// A file source that does not exist fails with
    /// [`Error::SourceNotFound`] before any parsing is attempted.
    pub fn load(&self) -> Result<SvgDocument> {
        match self {
            Self::Raw(svg) => SvgDocument::parse(svg.as_bytes()),
            Self::File(path) => SvgDocument::open(path),
        }
    }
}

impl<S: Into<String>> From<S> for SvgSource {
    fn from(s: S) -> Self {
        Self::Raw(s.into())
    }
}

// ============================================================================
// SvgDocument
// ============================================================================

/// A parsed SVG document ready to rasterize at any size.
pub struct SvgDocument {
    tree: Tree,
}

impl std::fmt::Debug for SvgDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.tree.size();
        f.debug_struct("SvgDocument")
            .field("width", &size.width())
            .field("height", &size.height())
            .finish()
    }
}

impl SvgDocument {
    /// Parses SVG (or SVGZ) bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let opts = Options::default();
        let tree = Tree::from_data(data, &opts)?;
        Ok(Self { tree })
    }

    /// Reads and parses an SVG file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Intrinsic size of the document in user units.
    pub fn intrinsic_size(&self) -> (f32, f32) {
        let size = self.tree.size();
        (size.width(), size.height())
    }

    /// Renders the document stretched to exactly `size × size` pixels.
    pub fn render(&self, size: u32) -> Result<IconImage> {
        let size = check_size(size)?;
        let mut pixmap = Pixmap::new(size, size).ok_or(Error::Surface(size))?;

        let (width, height) = self.intrinsic_size();
        let transform = Transform::from_scale(size as f32 / width, size as f32 / height);
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        Ok(IconImage::standard(pixmap_to_rgba_image(&pixmap)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;
    const WIDE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#00ff00"/></svg>"##;

    #[test]
    fn render_simple_svg() {
        let doc = SvgSource::from_svg(SIMPLE_SVG).load().unwrap();
        let img = doc.render(50).unwrap();
        assert_eq!(img.edge(), 50);
        assert!(img.dimensions().is_square());

        assert_eq!(img.data.get_pixel(25, 25).0, [255, 0, 0, 255]);
        assert_eq!(img.data.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn non_square_documents_are_stretched() {
        let doc = SvgDocument::parse(WIDE_SVG.as_bytes()).unwrap();
        assert_eq!(doc.intrinsic_size(), (200.0, 100.0));
        let img = doc.render(32).unwrap();
        assert_eq!(img.dimensions().width, 32);
        assert_eq!(img.dimensions().height, 32);
        assert_eq!(img.data.get_pixel(0, 31).0, [0, 255, 0, 255]);
    }

    #[test]
    fn zero_size_is_rejected() {
        let doc = SvgDocument::parse(SIMPLE_SVG.as_bytes()).unwrap();
        assert!(matches!(doc.render(0), Err(Error::InvalidSize(0))));
    }

    #[test]
    fn invalid_markup_is_an_svg_error() {
        let err = SvgSource::from_svg("not svg at all").load().unwrap_err();
        assert!(matches!(err, Error::Svg(_)));
    }

    #[test]
    fn missing_file_is_reported_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.svg");
        let err = SvgSource::from_path(&path).load().unwrap_err();
        match err {
            Error::SourceNotFound(p) => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_source_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.svg");
        std::fs::write(&path, SIMPLE_SVG).unwrap();
        let doc = SvgSource::from_path(&path).load().unwrap();
        assert_eq!(doc.render(16).unwrap().edge(), 16);
    }

    #[test]
    fn svg_source_into_from_string() {
        let source: SvgSource = "<svg></svg>".into();
        assert!(source.is_raw());
        assert!(!source.is_file());
    }
}
