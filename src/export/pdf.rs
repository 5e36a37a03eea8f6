//! Vector PDF export: one A4 page, 595x842 points.
//!
//! The scene is replayed through a canvas that emits PDF content
//! operators instead of pixels. Document units are 300 dpi pixels, so
//! positions scale by 72/300 onto the page; the y axis flips per
//! operator since PDF has its origin at the bottom left. Text stays
//! text: words are shown through the base-14 Helvetica and Times-Bold
//! fonts in WinAnsi encoding, and images embed as flate-compressed
//! RGB XObjects. Output is deterministic for a given scene.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use log::warn;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, Str};

use crate::fonts::FontRole;
use crate::geometry::{Point, Rect};
use crate::render::{Color, PageCanvas, RenderPass, render_scene};
use crate::scene::Scene;

/// A4 page size in points.
pub const PAGE_WIDTH_PT: f32 = 595.0;
pub const PAGE_HEIGHT_PT: f32 = 842.0;

/// Points per document unit.
const DOC_TO_PT: f32 = 72.0 / 300.0;

struct EmbeddedImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

/// Collects content-stream operators and the images they reference.
struct PdfCanvas {
    content: Content,
    scale: f32,
    images: Vec<EmbeddedImage>,
}

impl PdfCanvas {
    fn new(display_scale: f32) -> Self {
        let display_scale = if display_scale.is_finite() && display_scale > 0.0 {
            display_scale
        } else {
            warn!("ignoring display scale {display_scale}, using 1");
            1.0
        };
        Self {
            content: Content::new(),
            scale: DOC_TO_PT / display_scale,
            images: Vec::new(),
        }
    }

    fn x(&self, x: f32) -> f32 {
        quantize(x * self.scale)
    }

    /// Flip a document y onto the bottom-up page axis.
    fn y(&self, y: f32) -> f32 {
        quantize(PAGE_HEIGHT_PT - y * self.scale)
    }

    fn len(&self, v: f32) -> f32 {
        quantize(v * self.scale)
    }
}

/// Snap to 1/1000 pt so scaled coordinates serialize without float
/// noise ("9" rather than "8.9999998").
fn quantize(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

impl PageCanvas for PdfCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (r, g, b) = to_rgb_f32(color);
        let x = self.x(rect.left);
        let y = self.y(rect.bottom);
        let w = self.len(rect.width());
        let h = self.len(rect.height());
        self.content
            .set_fill_rgb(r, g, b)
            .rect(x, y, w, h)
            .fill_nonzero();
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let (r, g, b) = to_rgb_f32(color);
        let line_width = self.len(width);
        let x = self.x(rect.left);
        let y = self.y(rect.bottom);
        let w = self.len(rect.width());
        let h = self.len(rect.height());
        self.content
            .set_stroke_rgb(r, g, b)
            .set_line_width(line_width)
            .rect(x, y, w, h)
            .stroke();
    }

    fn draw_word(&mut self, word: &str, baseline: Point, role: FontRole, color: Color) {
        let (r, g, b) = to_rgb_f32(color);
        self.content.begin_text();
        self.content
            .set_font(font_name(role), self.len(role.size()));
        self.content.set_fill_rgb(r, g, b);
        self.content.next_line(self.x(baseline.x), self.y(baseline.y));
        self.content.show(Str(&winansi_bytes(word)));
        self.content.end_text();
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let name = format!("Im{}", self.images.len());
        self.images.push(flatten_image(image));

        self.content.save_state();
        self.content.transform([
            self.len(dest.width()),
            0.0,
            0.0,
            self.len(dest.height()),
            self.x(dest.left),
            self.y(dest.bottom),
        ]);
        self.content.x_object(Name(name.as_bytes()));
        self.content.restore_state();
    }
}

fn font_name(role: FontRole) -> Name<'static> {
    match role {
        FontRole::Body => Name(b"F1"),
        FontRole::Headline => Name(b"F2"),
    }
}

fn to_rgb_f32(color: Color) -> (f32, f32, f32) {
    (
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
    )
}

/// Raw content-stream operators for the page, before compression.
pub fn page_content(scene: &Scene, display_scale: f32) -> Vec<u8> {
    let mut canvas = PdfCanvas::new(display_scale);
    render_scene(scene, &mut canvas, RenderPass::Export);
    canvas.content.finish().into_vec()
}

/// Serialize the scene as a complete single-page PDF.
pub fn document_bytes(scene: &Scene, display_scale: f32) -> Vec<u8> {
    let mut canvas = PdfCanvas::new(display_scale);
    render_scene(scene, &mut canvas, RenderPass::Export);
    let images = std::mem::take(&mut canvas.images);
    let ops = canvas.content.finish().into_vec();

    let catalog_ref = Ref::new(1);
    let page_tree_ref = Ref::new(2);
    let page_ref = Ref::new(3);
    let content_ref = Ref::new(4);
    let body_font_ref = Ref::new(5);
    let headline_font_ref = Ref::new(6);
    let mut next = 7;
    let mut alloc = || {
        let r = Ref::new(next);
        next += 1;
        r
    };

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_ref).pages(page_tree_ref);
    pdf.pages(page_tree_ref).kids([page_ref]).count(1);

    // Embed images first so the page resources can reference them.
    let mut image_refs: Vec<(String, Ref)> = Vec::new();
    for (i, image) in images.iter().enumerate() {
        let rgb_ref = alloc();
        let smask_ref = if let Some(alpha) = &image.alpha {
            let mask_ref = alloc();
            let alpha_data = deflate(alpha);
            let mut mask = pdf.image_xobject(mask_ref, &alpha_data);
            mask.filter(Filter::FlateDecode);
            mask.width(image.width as i32);
            mask.height(image.height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            mask.finish();
            Some(mask_ref)
        } else {
            None
        };

        let rgb_data = deflate(&image.rgb);
        let mut xobj = pdf.image_xobject(rgb_ref, &rgb_data);
        xobj.filter(Filter::FlateDecode);
        xobj.width(image.width as i32);
        xobj.height(image.height as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_ref) = smask_ref {
            xobj.s_mask(mask_ref);
        }
        xobj.finish();
        image_refs.push((format!("Im{i}"), rgb_ref));
    }

    {
        let mut page = pdf.page(page_ref);
        page.media_box(PdfRect::new(0.0, 0.0, PAGE_WIDTH_PT, PAGE_HEIGHT_PT))
            .parent(page_tree_ref)
            .contents(content_ref);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            fonts.pair(Name(b"F1"), body_font_ref);
            fonts.pair(Name(b"F2"), headline_font_ref);
        }
        if !image_refs.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_refs {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let content_data = deflate(&ops);
    pdf.stream(content_ref, &content_data)
        .filter(Filter::FlateDecode);

    write_type1_font(&mut pdf, body_font_ref, FontRole::Body.family());
    write_type1_font(&mut pdf, headline_font_ref, FontRole::Headline.family());

    pdf.finish()
}

/// Base-14 font dictionary with WinAnsi encoding, so Latin-1 text maps
/// byte for byte.
fn write_type1_font(pdf: &mut Pdf, font_ref: Ref, base_font: &str) {
    let mut dict = pdf.indirect(font_ref).dict();
    dict.pair(Name(b"Type"), Name(b"Font"));
    dict.pair(Name(b"Subtype"), Name(b"Type1"));
    dict.pair(Name(b"BaseFont"), Name(base_font.as_bytes()));
    dict.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
    dict.finish();
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(6));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn flatten_image(image: &RgbaImage) -> EmbeddedImage {
    let (width, height) = image.dimensions();
    let rgb = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let alpha = if image.pixels().any(|p| p.0[3] < 255) {
        Some(image.pixels().map(|p| p.0[3]).collect())
    } else {
        None
    };
    EmbeddedImage {
        width,
        height,
        rgb,
        alpha,
    }
}

/// Encode text for a WinAnsi-encoded base-14 font. ASCII and Latin-1
/// pass through; the CP1252 punctuation block is mapped explicitly;
/// anything else prints as '?'.
fn winansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            ch if (ch as u32) < 0x80 => ch as u8,
            ch if (0xA0..=0xFF).contains(&(ch as u32)) => ch as u8,
            _ => b'?',
        })
        .collect()
}
