//! Packaging rendered icons into bundle assets.
//!
//! The [`Packager`] renders the standard PNG sizes once, then derives every
//! other asset by resampling the largest render:
//!
//! | File                              | Contents                               |
//! |-----------------------------------|----------------------------------------|
//! | `icon{N}x{N}.png`                 | one per standard size                  |
//! | `icon.png`                        | same bytes as the largest standard PNG |
//! | `icon.iconset/icon_{N}x{N}.png`   | macOS @1x entries                      |
//! | `icon.iconset/icon_{N}x{N}@2x.png`| macOS @2x entries                      |
//! | `icon.icns`                       | built by the platform icon compiler    |
//! | `icon.ico`                        | Windows multi-size icon                |
//! | `StoreLogo.png`                   | Windows Store logo                     |

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::Command;

use ico::{IconDir, IconDirEntry, ResourceType};

use crate::error::{Error, Result};
use crate::icon::{IconImage, IconSet};
use crate::profile::IconProfile;
use crate::renderer::IconRenderer;

/// Name of the iconset directory inside the output directory.
pub const ICONSET_DIR: &str = "icon.iconset";

// ============================================================================
// Configuration
// ============================================================================

/// Where and at which sizes assets are written.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageConfig {
    pub output_dir: PathBuf,
    pub standard_sizes: Vec<u32>,
    pub macos_sizes: Vec<u32>,
    pub ico_sizes: Vec<u32>,
    pub store_logo_size: u32,
    pub icns_tool: String,
    pub keep_iconset: bool,
}

impl From<&IconProfile> for PackageConfig {
    fn from(profile: &IconProfile) -> Self {
        Self {
            output_dir: profile.output_dir.clone(),
            standard_sizes: profile.standard_sizes.clone(),
            macos_sizes: profile.macos_sizes.clone(),
            ico_sizes: profile.ico_sizes.clone(),
            store_logo_size: profile.store_logo_size,
            icns_tool: profile.icns_tool.clone(),
            keep_iconset: profile.keep_iconset,
        }
    }
}

impl PackageConfig {
    pub fn iconset_dir(&self) -> PathBuf {
        self.output_dir.join(ICONSET_DIR)
    }
}

// ============================================================================
// Report
// ============================================================================

/// Result of the `.icns` step.
///
/// A missing or failing icon compiler does not abort packaging; the other
/// assets are still written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcnsOutcome {
    /// The container was written to this path.
    Built(PathBuf),
    /// The icon compiler could not be started (not installed).
    ToolMissing(String),
    /// The icon compiler ran but did not produce the container.
    ToolFailed(String),
}

impl IcnsOutcome {
    pub fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }
}

/// Everything a packaging run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
    /// Files written, in the order they were created.
    pub written: Vec<PathBuf>,
    pub icns: IcnsOutcome,
    /// Whether `icon.iconset/` is still on disk.
    pub iconset_kept: bool,
}

impl PackageReport {
    /// Written files that are still present in the output directory.
    pub fn existing(&self) -> impl Iterator<Item = &PathBuf> {
        self.written.iter().filter(|p| p.is_file())
    }
}

// ============================================================================
// Packager
// ============================================================================

/// Writes the full asset set for one renderer.
pub struct Packager<'a> {
    renderer: &'a dyn IconRenderer,
    config: PackageConfig,
}

impl<'a> Packager<'a> {
    pub fn new(renderer: &'a dyn IconRenderer, config: PackageConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Renders and writes every asset.
    pub fn run(&self) -> Result<PackageReport> {
        let out = &self.config.output_dir;
        fs::create_dir_all(out)?;
        log::info!("output directory: {}", out.display());

        let mut written = Vec::new();

        let rendered = self.write_standard_pngs(&mut written)?;
        let master = rendered.largest().ok_or(Error::NoSizes)?;

        self.write_iconset(&rendered, master, &mut written)?;

        let icns = self.build_icns();
        let iconset_kept = match &icns {
            IcnsOutcome::Built(_) if !self.config.keep_iconset => {
                fs::remove_dir_all(self.config.iconset_dir())?;
                log::info!("removed {}", ICONSET_DIR);
                false
            }
            _ => true,
        };
        if let IcnsOutcome::Built(path) = &icns {
            written.push(path.clone());
        }

        self.write_ico(master, &mut written)?;
        self.write_store_logo(master, &mut written)?;

        log::info!("icon generation complete: {} files", written.len());
        Ok(PackageReport {
            written,
            icns,
            iconset_kept,
        })
    }

    /// Renders each standard size and writes `icon{N}x{N}.png`, plus
    /// `icon.png` from the largest one.
    fn write_standard_pngs(&self, written: &mut Vec<PathBuf>) -> Result<IconSet> {
        let mut sizes = self.config.standard_sizes.clone();
        sizes.sort_unstable();
        sizes.dedup();
        let largest = *sizes.last().ok_or(Error::NoSizes)?;

        let rendered = self.renderer.render_all(&sizes)?;
        let out = &self.config.output_dir;

        for icon in &rendered {
            let n = icon.edge();
            let bytes = icon.to_png()?;
            write_file(&out.join(format!("icon{n}x{n}.png")), &bytes, written)?;
            if n == largest {
                write_file(&out.join("icon.png"), &bytes, written)?;
            }
        }
        Ok(rendered)
    }

    /// Writes the macOS iconset. @1x entries reuse a standard render when
    /// one exists; everything else is resampled from `master`.
    fn write_iconset(
        &self,
        rendered: &IconSet,
        master: &IconImage,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let dir = self.config.iconset_dir();
        fs::create_dir_all(&dir)?;

        for &n in &self.config.macos_sizes {
            let normal = match rendered.get(n) {
                Some(icon) => icon.clone(),
                None => master.resized(n, 1.0)?,
            };
            write_png(&dir.join(format!("icon_{n}x{n}.png")), &normal, written)?;

            if retina_fits(n, master.edge()) {
                let retina = master.resized(n * 2, 2.0)?;
                write_png(&dir.join(format!("icon_{n}x{n}@2x.png")), &retina, written)?;
            }
        }
        log::info!("generated {} iconset entries", self.config.macos_sizes.len());
        Ok(())
    }

    /// Compiles the iconset with the platform tool.
    fn build_icns(&self) -> IcnsOutcome {
        let tool = &self.config.icns_tool;
        let icns = self.config.output_dir.join("icon.icns");

        let output = Command::new(tool)
            .args(["-c", "icns"])
            .arg(self.config.iconset_dir())
            .arg("-o")
            .arg(&icns)
            .output();

        let outcome = match output {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                IcnsOutcome::ToolMissing(format!("{tool} not found (macOS only)"))
            }
            Err(e) => IcnsOutcome::ToolFailed(format!("failed to run {tool}: {e}")),
            Ok(output) if !output.status.success() => IcnsOutcome::ToolFailed(format!(
                "{tool} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            Ok(_) if !icns.is_file() => {
                IcnsOutcome::ToolFailed(format!("{tool} did not write {}", icns.display()))
            }
            Ok(_) => IcnsOutcome::Built(icns),
        };

        match &outcome {
            IcnsOutcome::Built(path) => log::info!("created {}", path.display()),
            IcnsOutcome::ToolMissing(reason) | IcnsOutcome::ToolFailed(reason) => {
                log::warn!("skipping icon.icns: {reason}")
            }
        }
        outcome
    }

    /// Writes `icon.ico` with every configured size not larger than
    /// `master`, smallest first.
    fn write_ico(&self, master: &IconImage, written: &mut Vec<PathBuf>) -> Result<()> {
        let mut sizes: Vec<u32> = self
            .config
            .ico_sizes
            .iter()
            .copied()
            .filter(|&n| n > 0 && n <= master.edge())
            .collect();
        sizes.sort_unstable();
        sizes.dedup();

        if sizes.is_empty() {
            log::warn!("no ICO sizes fit a {}px master, skipping icon.ico", master.edge());
            return Ok(());
        }

        let mut dir = IconDir::new(ResourceType::Icon);
        for &n in &sizes {
            let icon = master.resized(n, 1.0)?;
            let image = ico::IconImage::from_rgba_data(n, n, icon.data.into_raw());
            dir.add_entry(IconDirEntry::encode(&image)?);
            log::debug!("ICO layer {n}x{n}");
        }

        let path = self.config.output_dir.join("icon.ico");
        dir.write(BufWriter::new(File::create(&path)?))?;
        log::info!("created icon.ico ({sizes:?})");
        written.push(path);
        Ok(())
    }

    fn write_store_logo(&self, master: &IconImage, written: &mut Vec<PathBuf>) -> Result<()> {
        let logo = master.resized(self.config.store_logo_size, 1.0)?;
        write_png(&self.config.output_dir.join("StoreLogo.png"), &logo, written)
    }
}

/// Whether a @2x entry for logical size `n` can be resampled from a master
/// of edge `master_edge` without upscaling.
fn retina_fits(n: u32, master_edge: u32) -> bool {
    n.checked_mul(2).is_some_and(|d| d <= master_edge)
}

fn write_png(path: &Path, icon: &IconImage, written: &mut Vec<PathBuf>) -> Result<()> {
    write_file(path, &icon.to_png()?, written)
}

fn write_file(path: &Path, bytes: &[u8], written: &mut Vec<PathBuf>) -> Result<()> {
    fs::write(path, bytes)?;
    log::debug!("wrote {}", path.display());
    written.push(path.to_path_buf());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ProceduralRenderer;

    const MISSING_TOOL: &str = "app-iconkit-no-such-icon-compiler";

    fn small_config(out: &Path) -> PackageConfig {
        PackageConfig {
            output_dir: out.to_path_buf(),
            standard_sizes: vec![32, 64],
            macos_sizes: vec![16, 32],
            ico_sizes: vec![48, 16, 32, 128],
            store_logo_size: 50,
            icns_tool: MISSING_TOOL.to_string(),
            keep_iconset: false,
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn retina_needs_room_in_master() {
        assert!(retina_fits(512, 1024));
        assert!(!retina_fits(1024, 1024));
        assert!(!retina_fits(u32::MAX / 2 + 1, 1024));
        assert!(!retina_fits(u32::MAX, u32::MAX));
    }

    #[test]
    fn standard_sizes_produce_five_pngs_and_identical_icon_png() {
        let dir = tempfile::tempdir().unwrap();
        let profile = IconProfile::new()
            .with_output_dir(dir.path())
            .with_icns_tool(MISSING_TOOL);
        let renderer = ProceduralRenderer::from_profile(&profile);

        let report = Packager::new(&renderer, PackageConfig::from(&profile))
            .run()
            .unwrap();

        let standard: Vec<_> = file_names(dir.path())
            .into_iter()
            .filter(|n| n.starts_with("icon") && n.ends_with(".png") && n.contains('x'))
            .collect();
        assert_eq!(
            standard,
            vec![
                "icon1024x1024.png",
                "icon128x128.png",
                "icon256x256.png",
                "icon32x32.png",
                "icon512x512.png",
            ]
        );

        let master = fs::read(dir.path().join("icon1024x1024.png")).unwrap();
        let copy = fs::read(dir.path().join("icon.png")).unwrap();
        assert_eq!(master, copy);

        let decoded = image::load_from_memory(&copy).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 1024));
        assert!(report.existing().count() >= 7);
    }

    #[test]
    fn missing_icon_compiler_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ProceduralRenderer::default();
        let report = Packager::new(&renderer, small_config(dir.path()))
            .run()
            .unwrap();

        assert!(matches!(report.icns, IcnsOutcome::ToolMissing(_)));
        assert!(report.iconset_kept);
        assert!(!dir.path().join("icon.icns").exists());
        // the rest of the run still happened
        assert!(dir.path().join("icon.ico").is_file());
        assert!(dir.path().join("StoreLogo.png").is_file());
    }

    #[test]
    fn iconset_naming() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ProceduralRenderer::default();
        Packager::new(&renderer, small_config(dir.path()))
            .run()
            .unwrap();

        // 16@2x and 32@2x fit under the 64px master; nothing larger does
        assert_eq!(
            file_names(&dir.path().join(ICONSET_DIR)),
            vec![
                "icon_16x16.png",
                "icon_16x16@2x.png",
                "icon_32x32.png",
                "icon_32x32@2x.png",
            ]
        );

        let retina = image::open(dir.path().join(ICONSET_DIR).join("icon_32x32@2x.png")).unwrap();
        assert_eq!(retina.width(), 64);
    }

    #[test]
    fn iconset_reuses_standard_render() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ProceduralRenderer::default();
        Packager::new(&renderer, small_config(dir.path()))
            .run()
            .unwrap();

        let standard = fs::read(dir.path().join("icon32x32.png")).unwrap();
        let iconset = fs::read(dir.path().join(ICONSET_DIR).join("icon_32x32.png")).unwrap();
        assert_eq!(standard, iconset);
    }

    #[test]
    fn ico_holds_sizes_up_to_master_smallest_first() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ProceduralRenderer::default();
        Packager::new(&renderer, small_config(dir.path()))
            .run()
            .unwrap();

        let ico = IconDir::read(File::open(dir.path().join("icon.ico")).unwrap()).unwrap();
        let widths: Vec<_> = ico.entries().iter().map(|e| e.width()).collect();
        assert_eq!(widths, vec![16, 32, 48]);
    }

    #[test]
    fn store_logo_is_fifty_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ProceduralRenderer::default();
        Packager::new(&renderer, small_config(dir.path()))
            .run()
            .unwrap();

        let logo = image::open(dir.path().join("StoreLogo.png")).unwrap();
        assert_eq!((logo.width(), logo.height()), (50, 50));
    }

    #[test]
    fn empty_standard_sizes_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.standard_sizes.clear();
        let renderer = ProceduralRenderer::default();
        assert!(matches!(
            Packager::new(&renderer, config).run(),
            Err(Error::NoSizes)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_icon_compiler_keeps_iconset() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.icns_tool = "false".to_string();
        let renderer = ProceduralRenderer::default();

        let report = Packager::new(&renderer, config).run().unwrap();
        assert!(matches!(report.icns, IcnsOutcome::ToolFailed(_)));
        assert!(dir.path().join(ICONSET_DIR).is_dir());
        assert!(dir.path().join("icon.ico").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn successful_icon_compiler_removes_iconset() {
        use std::os::unix::fs::PermissionsExt;

        let tools = tempfile::tempdir().unwrap();
        let tool = tools.path().join("fake-iconutil");
        // invoked as: -c icns <iconset> -o <icns>
        fs::write(&tool, "#!/bin/sh\nprintf icns > \"$5\"\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.icns_tool = tool.to_string_lossy().into_owned();
        let renderer = ProceduralRenderer::default();

        let report = Packager::new(&renderer, config.clone()).run().unwrap();
        let icns = dir.path().join("icon.icns");
        assert_eq!(report.icns, IcnsOutcome::Built(icns.clone()));
        assert!(report.written.contains(&icns));
        assert!(!report.iconset_kept);
        assert!(!dir.path().join(ICONSET_DIR).exists());

        config.keep_iconset = true;
        let report = Packager::new(&renderer, config).run().unwrap();
        assert!(report.icns.is_built());
        assert!(report.iconset_kept);
        assert!(dir.path().join(ICONSET_DIR).is_dir());
    }
}
