//! Serializable generation profile.
//!
//! An [`IconProfile`] captures which artwork to render and where and at what
//! sizes the packaged assets go. It is stored as JSON next to the project so
//! icon regeneration is reproducible.
//!
//! # Example
//!
//! ```
//! use app_iconkit::{IconPalette, IconProfile};
//!
//! let profile = IconProfile::new()
//!     .with_palette(IconPalette::Stone)
//!     .with_output_dir("src-tauri/icons");
//!
//! let json = profile.to_json().unwrap();
//! let restored = IconProfile::from_json(&json).unwrap();
//! assert_eq!(restored.palette, IconPalette::Stone);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layer::{BorderConfig, ColorStop, GradientConfig, GradientDirection, MotifConfig};

// ============================================================================
// Palette
// ============================================================================

/// Colour scheme for the procedural icon. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum IconPalette {
    /// Sky blue → violet → pink, left to right, with white nodes.
    #[default]
    Vivid,
    /// Light stone top to bottom with blue and slate nodes.
    Stone,
}

impl IconPalette {
    /// Background gradient for this palette.
    pub fn background(self) -> GradientConfig {
        match self {
            Self::Vivid => GradientConfig::linear(
                &[
                    ColorStop::new(14, 165, 233),
                    ColorStop::new(139, 92, 246),
                    ColorStop::new(236, 72, 153),
                ],
                GradientDirection::Horizontal,
            ),
            Self::Stone => GradientConfig::linear(
                &[ColorStop::new(245, 245, 244), ColorStop::new(214, 211, 209)],
                GradientDirection::Vertical,
            ),
        }
    }

    /// Line and node colours, before layer toggles are applied.
    pub fn motif(self) -> MotifConfig {
        match self {
            Self::Vivid => {
                let white = ColorStop::new(255, 255, 255);
                MotifConfig {
                    line: white,
                    ring: white,
                    accents: [
                        ColorStop::new(14, 165, 233),
                        ColorStop::new(139, 92, 246),
                        ColorStop::new(236, 72, 153),
                    ],
                    layered: true,
                    filler_dots: true,
                }
            }
            Self::Stone => MotifConfig {
                line: ColorStop::new(120, 113, 108),
                ring: ColorStop::new(250, 250, 249),
                accents: [
                    ColorStop::new(59, 130, 246),
                    ColorStop::new(29, 78, 216),
                    ColorStop::new(71, 85, 105),
                ],
                layered: true,
                filler_dots: true,
            },
        }
    }

    /// Highlight border for this palette.
    pub fn border(self) -> BorderConfig {
        match self {
            Self::Vivid => BorderConfig::new(ColorStop::new(255, 255, 255), 30),
            Self::Stone => BorderConfig::new(ColorStop::new(120, 113, 108), 40),
        }
    }
}

// ============================================================================
// Source & Layer Settings
// ============================================================================

/// Where the artwork comes from.
///
/// ```json
/// { "svgPath": "icons/app.svg" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSettings {
    /// SVG file, resolved relative to the working directory.
    pub svg_path: PathBuf,
}

/// Toggles for the optional parts of the procedural icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerSettings {
    pub motif: bool,
    pub border: bool,
    pub filler_dots: bool,
    pub layered: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            motif: true,
            border: true,
            filler_dots: true,
            layered: true,
        }
    }
}

// ============================================================================
// IconProfile
// ============================================================================

/// Standard PNG sizes written as `icon{N}x{N}.png`.
pub const STANDARD_SIZES: [u32; 5] = [32, 128, 256, 512, 1024];

/// Logical sizes in the macOS iconset.
pub const MACOS_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Sizes packed into the Windows `.ico`.
pub const ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Edge length of `StoreLogo.png`.
pub const STORE_LOGO_SIZE: u32 = 50;

/// A serializable profile containing all generation settings.
///
/// Every field has a default, so `{}` is a valid profile that draws the
/// vivid procedural icon into `icons/`.
///
/// # JSON Format
///
/// ```json
/// {
///   "palette": "stone",
///   "source": { "svgPath": "icons/app.svg" },
///   "layers": { "motif": true, "border": false },
///   "outputDir": "src-tauri/icons",
///   "standardSizes": [32, 128, 256, 512, 1024],
///   "icnsTool": "iconutil",
///   "keepIconset": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconProfile {
    pub palette: IconPalette,

    /// SVG source. `None` draws the procedural icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceSettings>,

    pub layers: LayerSettings,

    pub output_dir: PathBuf,

    pub standard_sizes: Vec<u32>,

    pub macos_sizes: Vec<u32>,

    pub ico_sizes: Vec<u32>,

    pub store_logo_size: u32,

    /// Program that compiles an iconset into `.icns`.
    pub icns_tool: String,

    /// Keep `icon.iconset/` after a successful `.icns` build.
    pub keep_iconset: bool,
}

impl Default for IconProfile {
    fn default() -> Self {
        Self {
            palette: IconPalette::default(),
            source: None,
            layers: LayerSettings::default(),
            output_dir: PathBuf::from("icons"),
            standard_sizes: STANDARD_SIZES.to_vec(),
            macos_sizes: MACOS_SIZES.to_vec(),
            ico_sizes: ICO_SIZES.to_vec(),
            store_logo_size: STORE_LOGO_SIZE,
            icns_tool: "iconutil".to_string(),
            keep_iconset: false,
        }
    }
}

impl IconProfile {
    /// Creates a profile with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the palette.
    pub fn with_palette(mut self, palette: IconPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Renders from an SVG file instead of drawing procedurally.
    pub fn with_svg(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(SourceSettings {
            svg_path: path.into(),
        });
        self
    }

    /// Sets layer toggles.
    pub fn with_layers(mut self, layers: LayerSettings) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the standard PNG sizes.
    pub fn with_standard_sizes(mut self, sizes: impl Into<Vec<u32>>) -> Self {
        self.standard_sizes = sizes.into();
        self
    }

    /// Sets the program used to build `.icns`.
    pub fn with_icns_tool(mut self, tool: impl Into<String>) -> Self {
        self.icns_tool = tool.into();
        self
    }

    /// Keeps the iconset directory after building `.icns`.
    pub fn with_keep_iconset(mut self, keep: bool) -> Self {
        self.keep_iconset = keep;
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json(&json)?;
        log::debug!("loaded profile from {}", path.display());
        Ok(profile)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = IconProfile::new()
            .with_palette(IconPalette::Stone)
            .with_svg("art/app.svg")
            .with_layers(LayerSettings {
                border: false,
                ..LayerSettings::default()
            })
            .with_standard_sizes([64, 128]);

        let json = profile.to_json().unwrap();
        let restored = IconProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn profile_json_format() {
        let json = IconProfile::new()
            .with_svg("a.svg")
            .to_json_pretty()
            .unwrap();

        assert!(json.contains("\"palette\": \"vivid\""));
        assert!(json.contains("\"svgPath\": \"a.svg\""));
        assert!(json.contains("\"outputDir\""));
        assert!(json.contains("\"fillerDots\""));
        assert!(json.contains("\"keepIconset\": false"));
    }

    #[test]
    fn procedural_profile_omits_source() {
        let json = IconProfile::new().to_json().unwrap();
        assert!(!json.contains("\"source\""));
    }

    #[test]
    fn empty_profile_deserializes_to_defaults() {
        let profile = IconProfile::from_json("{}").unwrap();
        assert_eq!(profile, IconProfile::default());
        assert_eq!(profile.standard_sizes, vec![32, 128, 256, 512, 1024]);
        assert_eq!(profile.store_logo_size, 50);
        assert_eq!(profile.icns_tool, "iconutil");
    }

    #[test]
    fn partial_layer_settings_keep_other_defaults() {
        let profile = IconProfile::from_json(r#"{"layers": {"border": false}}"#).unwrap();
        assert!(!profile.layers.border);
        assert!(profile.layers.motif);
        assert!(profile.layers.layered);
    }

    #[test]
    fn unknown_palette_is_rejected() {
        assert!(IconProfile::from_json(r#"{"palette": "neon"}"#).is_err());
    }

    #[test]
    fn load_reports_bad_json_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(IconProfile::load(&bad), Err(Error::Profile(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(IconProfile::load(&missing), Err(Error::Io(_))));

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"palette": "stone"}"#).unwrap();
        assert_eq!(IconProfile::load(&good).unwrap().palette, IconPalette::Stone);
    }

    #[test]
    fn palettes_differ() {
        assert_ne!(IconPalette::Vivid.background(), IconPalette::Stone.background());
        assert_eq!(
            IconPalette::Stone.background().direction,
            GradientDirection::Vertical
        );
    }
}
