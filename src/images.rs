//! Image loading and the two-copy pixel store behind image objects.
//!
//! Every image object keeps the decoded original untouched and derives
//! a display copy stretched to the object's current bounds. Interactive
//! drawing always blits the display copy 1:1, so paint cost stays flat
//! while the object is dragged; exports go back to the original so
//! print quality never degrades through repeated resizes.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use fast_image_resize as fr;
use image::RgbaImage;
use log::{debug, warn};

/// Errors from decoding an image file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read image {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path:?}")]
    Format {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Pixel data behind one image object: the decoded original plus a
/// display copy matching the object's bounds.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    source: RgbaImage,
    display: RgbaImage,
    aspect_ratio: f32,
}

impl ImagePayload {
    /// Decode `path` and build the display copy at `display_w` x
    /// `display_h` document units.
    pub fn load(path: &Path, display_w: f32, display_h: f32) -> Result<Self, DecodeError> {
        match imagesize::size(path) {
            Ok(dim) => debug!("image {path:?} probes as {}x{}", dim.width, dim.height),
            Err(e) => warn!("failed to probe image size for {path:?}: {e}"),
        }

        let data = std::fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&data).map_err(|source| DecodeError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba(decoded.to_rgba8(), display_w, display_h))
    }

    /// Build a payload from pixels already in memory.
    pub fn from_rgba(source: RgbaImage, display_w: f32, display_h: f32) -> Self {
        let (w, h) = source.dimensions();
        let aspect_ratio = if h == 0 { 1.0 } else { w as f32 / h as f32 };
        let display = stretch_to(&source, display_w, display_h);
        Self {
            source,
            display,
            aspect_ratio,
        }
    }

    /// Untouched decode of the file, for print and PDF output.
    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// Copy stretched to the object's bounds, for interactive drawing.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }

    /// Width over height of the original pixels.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Rebuild the display copy for new bounds, always from the
    /// original so quality does not decay across repeated resizes.
    pub fn regenerate_display(&mut self, display_w: f32, display_h: f32) {
        self.display = stretch_to(&self.source, display_w, display_h);
    }
}

/// Stretch `source` to the given document-unit dimensions, ignoring
/// aspect ratio. Dimensions are clamped to at least one pixel.
fn stretch_to(source: &RgbaImage, display_w: f32, display_h: f32) -> RgbaImage {
    let w = (display_w.round().max(1.0)) as u32;
    let h = (display_h.round().max(1.0)) as u32;
    if source.dimensions() == (w, h) {
        return source.clone();
    }
    match fast_resize(source, w, h) {
        Ok(resized) => resized,
        Err(e) => {
            warn!("fast resize to {w}x{h} failed: {e}, falling back to slow resize");
            image::imageops::resize(source, w, h, image::imageops::FilterType::Lanczos3)
        }
    }
}

/// Lanczos3 resize through fast_image_resize.
fn fast_resize(
    source: &RgbaImage,
    new_width: u32,
    new_height: u32,
) -> Result<RgbaImage, Box<dyn std::error::Error>> {
    let (src_width, src_height) = source.dimensions();

    let src_view = fr::Image::from_vec_u8(
        NonZeroU32::new(src_width).ok_or("invalid source width")?,
        NonZeroU32::new(src_height).ok_or("invalid source height")?,
        source.as_raw().clone(),
        fr::PixelType::U8x4,
    )?;

    let dst_width = NonZeroU32::new(new_width).ok_or("invalid target width")?;
    let dst_height = NonZeroU32::new(new_height).ok_or("invalid target height")?;
    let mut dst_image = fr::Image::new(dst_width, dst_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));
    resizer.resize(&src_view.view(), &mut dst_image.view_mut())?;

    RgbaImage::from_raw(new_width, new_height, dst_image.into_vec())
        .ok_or_else(|| "resized buffer has wrong length".into())
}
