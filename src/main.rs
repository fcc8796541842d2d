//! `app-iconkit` command-line entry point.
//!
//! ```text
//! app-iconkit --profile icons.json
//! app-iconkit --svg assets/icon.svg --out src-tauri/icons
//! app-iconkit --palette stone --render 512 --to preview.png
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use app_iconkit::{IconPalette, IconProfile, PackageConfig, Packager, Result, renderer_for};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "app-iconkit")]
#[command(about = "Generate application icon assets (PNG, ICO, ICNS)")]
#[command(version)]
struct Args {
    /// JSON profile to start from
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Render from this SVG instead of drawing procedurally
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Colour scheme for the procedural icon
    #[arg(long, value_enum)]
    palette: Option<IconPalette>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Keep icon.iconset/ after building icon.icns
    #[arg(long)]
    keep_iconset: bool,

    /// Render a single PNG of this size instead of the full asset set
    #[arg(long, requires = "to")]
    render: Option<u32>,

    /// Destination for --render
    #[arg(long, requires = "render")]
    to: Option<PathBuf>,
}

impl Args {
    /// Loads the profile, then lets flags override it.
    fn profile(&self) -> Result<IconProfile> {
        let mut profile = match &self.profile {
            Some(path) => IconProfile::load(path)?,
            None => IconProfile::new(),
        };
        if let Some(svg) = &self.svg {
            profile = profile.with_svg(svg);
        }
        if let Some(palette) = self.palette {
            profile = profile.with_palette(palette);
        }
        if let Some(out) = &self.out {
            profile = profile.with_output_dir(out);
        }
        if self.keep_iconset {
            profile = profile.with_keep_iconset(true);
        }
        Ok(profile)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let profile = args.profile()?;
    let renderer = renderer_for(&profile)?;

    if let (Some(size), Some(to)) = (args.render, &args.to) {
        let icon = renderer.render(size)?;
        icon.data.save(to)?;
        log::info!("wrote {} ({size}x{size})", to.display());
        return Ok(());
    }

    let packager = Packager::new(renderer.as_ref(), PackageConfig::from(&profile));
    let report = packager.run()?;

    log::info!("generated files:");
    for (name, bytes) in output_listing(&packager.config().output_dir)? {
        let kb = bytes as f64 / 1024.0;
        log::info!("  - {name:32} ({kb:6.1} KB)");
    }
    if !report.icns.is_built() {
        log::warn!("icon.icns was not built: {:?}", report.icns);
    }
    Ok(())
}

/// Regular files directly inside `dir` with their sizes, sorted by name.
fn output_listing(dir: &Path) -> Result<Vec<(String, u64)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() {
            files.push((entry.file_name().to_string_lossy().into_owned(), meta.len()));
        }
    }
    files.sort();
    Ok(files)
}
