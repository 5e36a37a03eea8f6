use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use setzkasten::editor::Editor;
use setzkasten::export;
use setzkasten::fonts::FontLibrary;
use setzkasten::input::PointerEvent;
use setzkasten::scene::Scene;
use setzkasten::settings;

/// A4 paste-up canvas: seeds the demo page, replays pointer gestures,
/// and exports the result as a print raster or a PDF.
#[derive(Parser, Debug)]
#[command(name = "setzkasten", version, about)]
struct Cli {
    /// Seed image for the picture frame on the demo page
    #[arg(long)]
    image: Option<PathBuf>,

    /// Viewport for fit-to-view, as WIDTHxHEIGHT device pixels
    #[arg(long, default_value = "1200x800")]
    viewport: String,

    /// Pointer-script step, repeatable: "down left 150 150",
    /// "move 160 160", "up left", "wheel 1 100 100"
    #[arg(long)]
    gesture: Vec<String>,

    /// Write the print raster (2481x3507 PNG) here
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the single-page PDF here
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Display scale factor the PDF output divides out
    #[arg(long, default_value_t = 1.0)]
    display_scale: f32,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// TTF file for body text (overrides the config file)
    #[arg(long)]
    body_font: Option<PathBuf>,

    /// TTF file for headlines (overrides the config file)
    #[arg(long)]
    headline_font: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from("setzkasten.log"));
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&log_path)
            .with_context(|| format!("cannot create log file {}", log_path.display()))?,
    )?;

    info!("Starting setzkasten");

    let result = run(cli);
    if let Err(err) = &result {
        error!("Run failed: {err:?}");
    }

    info!("Shutting down setzkasten");
    result
}

fn run(cli: Cli) -> Result<()> {
    settings::load_settings();

    let body_font = cli.body_font.or_else(settings::get_body_font);
    let headline_font = cli.headline_font.or_else(settings::get_headline_font);
    let fonts = FontLibrary::discover(body_font.as_deref(), headline_font.as_deref());

    let scene = Scene::seed_demo(cli.image.as_deref());
    let mut editor = Editor::new(scene);

    let (viewport_w, viewport_h) = parse_viewport(&cli.viewport)?;
    editor.fit_to_view(viewport_w, viewport_h);

    for (i, step) in cli.gesture.iter().enumerate() {
        let event: PointerEvent = step
            .parse()
            .with_context(|| format!("gesture step {}: {step:?}", i + 1))?;
        editor.apply(event);
    }
    debug!("replayed {} gesture steps", cli.gesture.len());

    if let Some(path) = cli.png {
        let path = resolve_export_path(path, "png");
        export::write_print_png(editor.scene(), &fonts, &path)?;
        println!("wrote {}", path.display());
    }
    if let Some(path) = cli.pdf {
        let path = resolve_export_path(path, "pdf");
        export::write_pdf(editor.scene(), cli.display_scale, &path)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn parse_viewport(s: &str) -> Result<(f32, f32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .context("viewport must look like 1200x800")?;
    let width: f32 = w
        .trim()
        .parse()
        .with_context(|| format!("bad viewport width {w:?}"))?;
    let height: f32 = h
        .trim()
        .parse()
        .with_context(|| format!("bad viewport height {h:?}"))?;
    if !(width > 0.0 && height > 0.0) {
        anyhow::bail!("viewport must be positive, got {s:?}");
    }
    Ok((width, height))
}

/// A directory target gets a dated default name; a bare filename lands
/// in the configured export directory when one is set.
fn resolve_export_path(path: PathBuf, extension: &str) -> PathBuf {
    if path.is_dir() {
        return path.join(export::default_export_name("seite", extension));
    }
    let bare = path.is_relative() && path.parent().is_none_or(|p| p.as_os_str().is_empty());
    if bare {
        if let Some(dir) = settings::get_export_dir() {
            return dir.join(path);
        }
    }
    path
}
