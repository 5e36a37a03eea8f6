//! Pixel rendering of a page through tiny-skia.
//!
//! One `RasterCanvas` is a pixmap plus the document-to-device
//! transform; draw calls arrive in document units and are transformed
//! on the way in. Glyphs are filled from the discovered font faces,
//! with pen advances taken from the same width tables the layout
//! engine measures with, so rasterized spacing matches layout even
//! when the face is a metric substitute.

use anyhow::{Context, Result};
use image::RgbaImage;
use log::warn;
use tiny_skia::{
    FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform as SkiaTransform,
};

use crate::fonts::{FontLibrary, FontRole};
use crate::geometry::{Point, Rect, Transform};
use crate::render::{Color, PageCanvas};

pub struct RasterCanvas<'a> {
    pixmap: Pixmap,
    ts: SkiaTransform,
    fonts: &'a FontLibrary,
    glyph_warned: [bool; 2],
}

impl<'a> RasterCanvas<'a> {
    /// Allocate a `width` x `height` surface cleared to `clear`, with
    /// `view` mapping document units to pixels.
    pub fn new(
        width: u32,
        height: u32,
        view: Transform,
        fonts: &'a FontLibrary,
        clear: Color,
    ) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate a {width}x{height} surface"))?;
        pixmap.fill(to_skia_color(clear));
        Ok(Self {
            pixmap,
            ts: to_skia_transform(view),
            fonts,
            glyph_warned: [false; 2],
        })
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Copy out straight-alpha pixels.
    pub fn to_rgba(&self) -> RgbaImage {
        let mut data = self.pixmap.data().to_vec();
        unpremultiply_rgba(&mut data);
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.pixmap.width(), self.pixmap.height()))
    }

    fn solid_paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    fn role_index(role: FontRole) -> usize {
        match role {
            FontRole::Body => 0,
            FontRole::Headline => 1,
        }
    }
}

impl PageCanvas for RasterCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(sk_rect) =
            tiny_skia::Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom)
        else {
            return;
        };
        self.pixmap
            .fill_rect(sk_rect, &Self::solid_paint(color), self.ts, None);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let Some(sk_rect) =
            tiny_skia::Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom)
        else {
            return;
        };
        let path = PathBuilder::from_rect(sk_rect);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::solid_paint(color), &stroke, self.ts, None);
    }

    fn draw_word(&mut self, word: &str, baseline: Point, role: FontRole, color: Color) {
        let Some(face) = self.fonts.face(role) else {
            let idx = Self::role_index(role);
            if !self.glyph_warned[idx] {
                warn!("no {role:?} face available, glyphs are skipped");
                self.glyph_warned[idx] = true;
            }
            return;
        };

        let metrics = role.metrics();
        let size = role.size();
        let path = face.with_face(|face| {
            let units = f32::from(face.units_per_em()).max(1.0);
            let mut builder = GlyphPath {
                pb: PathBuilder::new(),
                scale: size / units,
                x: baseline.x,
                y: baseline.y,
            };
            for ch in word.chars() {
                if let Some(glyph) = face.glyph_index(ch) {
                    face.outline_glyph(glyph, &mut builder);
                }
                builder.x += f32::from(metrics.advance(ch)) * size / 1000.0;
            }
            builder.pb.finish()
        });

        if let Some(Some(path)) = path {
            self.pixmap.fill_path(
                &path,
                &Self::solid_paint(color),
                FillRule::Winding,
                self.ts,
                None,
            );
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let Some(src) = premultiplied_pixmap(image) else {
            warn!("cannot stage a {w}x{h} image for drawing");
            return;
        };

        let paint = PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let ts = self
            .ts
            .pre_translate(dest.left, dest.top)
            .pre_scale(dest.width() / w as f32, dest.height() / h as f32);
        self.pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, ts, None);
    }
}

/// Feeds ttf-parser outline callbacks into a tiny-skia path, mapping
/// font units (y up) to document units (y down) around the pen.
struct GlyphPath {
    pb: PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl ttf_parser::OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.pb.move_to(self.x + x * self.scale, self.y - y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.pb.line_to(self.x + x * self.scale, self.y - y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.pb.quad_to(
            self.x + x1 * self.scale,
            self.y - y1 * self.scale,
            self.x + x * self.scale,
            self.y - y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.pb.cubic_to(
            self.x + x1 * self.scale,
            self.y - y1 * self.scale,
            self.x + x2 * self.scale,
            self.y - y2 * self.scale,
            self.x + x * self.scale,
            self.y - y * self.scale,
        );
    }

    fn close(&mut self) {
        self.pb.close();
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_skia_transform(t: Transform) -> SkiaTransform {
    SkiaTransform::from_row(t.sx, t.ky, t.kx, t.sy, t.tx, t.ty)
}

fn premultiplied_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let (w, h) = image.dimensions();
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for px in image.pixels() {
        let [r, g, b, a] = px.0;
        let c = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, IntSize::from_wh(w, h)?)
}

fn unpremultiply_rgba(data: &mut [u8]) {
    for pixel in data.chunks_mut(4) {
        let alpha = pixel[3];
        if alpha == 0 {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            continue;
        }
        if alpha == 255 {
            continue;
        }
        let a = alpha as u32;
        pixel[0] = ((pixel[0] as u32 * 255 + a / 2) / a).min(255) as u8;
        pixel[1] = ((pixel[1] as u32 * 255 + a / 2) / a).min(255) as u8;
        pixel[2] = ((pixel[2] as u32 * 255 + a / 2) / a).min(255) as u8;
    }
}
