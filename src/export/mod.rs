//! Export sinks: the print raster (PNG) and the vector PDF.
//!
//! Both replay the scene's export pass, so selection and hover marks
//! never leak into output. Files land atomically: bytes go to a temp
//! file in the target directory first, then persist into place, so a
//! failed export never leaves a truncated file behind.

pub mod filename;
pub mod pdf;

pub use filename::{default_export_name, sanitize_filename};

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbaImage;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::fonts::FontLibrary;
use crate::geometry::Transform;
use crate::raster::RasterCanvas;
use crate::render::{self, Color, RenderPass, render_scene};
use crate::scene::Scene;

/// Print raster size: A4 at 300 dpi, matching the document page.
pub const PRINT_WIDTH: u32 = render::PAGE_WIDTH as u32;
pub const PRINT_HEIGHT: u32 = render::PAGE_HEIGHT as u32;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode {path} as png")]
    PngEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Render the scene at print resolution onto a white page.
///
/// The view transform is not applied: one document unit is one output
/// pixel, so the full 2481x3507 page lands regardless of how the
/// editor is currently panned or zoomed.
pub fn print_raster(scene: &Scene, fonts: &FontLibrary) -> Result<RgbaImage> {
    let mut canvas = RasterCanvas::new(
        PRINT_WIDTH,
        PRINT_HEIGHT,
        Transform::identity(),
        fonts,
        Color::WHITE,
    )?;
    render_scene(scene, &mut canvas, RenderPass::Export);
    debug!("rendered print raster at {PRINT_WIDTH}x{PRINT_HEIGHT}");
    Ok(canvas.to_rgba())
}

/// Export the scene as a print-resolution PNG at `path`.
pub fn write_print_png(scene: &Scene, fonts: &FontLibrary, path: &Path) -> Result<()> {
    let raster = print_raster(scene, fonts)?;
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|source| ExportError::PngEncode {
            path: path.to_path_buf(),
            source,
        })?;
    write_atomic(path, &bytes)?;
    info!("saved print raster to {}", path.display());
    Ok(())
}

/// Export the scene as a single-page PDF at `path`.
pub fn write_pdf(scene: &Scene, display_scale: f32, path: &Path) -> Result<()> {
    let bytes = pdf::document_bytes(scene, display_scale);
    write_atomic(path, &bytes)?;
    info!("saved pdf to {}", path.display());
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(bytes).map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
