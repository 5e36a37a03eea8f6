//! Scene painting over an abstract page canvas.
//!
//! Everything that knows how an object looks lives here; the object
//! model itself only carries state. A canvas implementation decides
//! what a draw call becomes: screen pixels, print pixels or PDF
//! operators.

use image::RgbaImage;

use crate::fonts::FontRole;
use crate::geometry::{Point, Rect};
use crate::layout;
use crate::objects::PageObject;
use crate::scene::Scene;

/// Page size in document units: A4 at 300 dpi.
pub const PAGE_WIDTH: f32 = 2481.0;
pub const PAGE_HEIGHT: f32 = 3507.0;

pub fn page_rect() -> Rect {
    Rect::from_xywh(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT)
}

/// RGBA color, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Neutral grey behind the sheet in the editor view.
    pub const BACKDROP: Color = Color::rgb(200, 200, 200);
    /// Selection and hover accents, and selected text fills.
    pub const SELECTION: Color = Color::rgb(255, 0, 0);
    /// Fill for image objects whose file never decoded.
    pub const PLACEHOLDER: Color = Color::rgb(230, 230, 230);
}

/// Which audience a paint run is for. The editor pass shows working
/// state (selection and hover accents, display-resolution images); the
/// export pass paints print output (original pixels, no accents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    Editor,
    Export,
}

/// An abstract 2D sink for one page. Coordinates are document-space;
/// implementations apply their own device transform.
pub trait PageCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);
    /// Draw one word with its left edge at `baseline` (x = left, y =
    /// baseline height).
    fn draw_word(&mut self, word: &str, baseline: Point, role: FontRole, color: Color);
    /// Blit `image` stretched into `dest`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);
}

const OUTLINE_WIDTH: f32 = 2.0;
const SHEET_BORDER_WIDTH: f32 = 1.0;

/// Paint the whole scene. The editor pass lays the white sheet and its
/// border under and over the objects; the export pass paints the
/// objects only, leaving background policy to the sink.
pub fn render_scene(scene: &Scene, canvas: &mut dyn PageCanvas, pass: RenderPass) {
    if pass == RenderPass::Editor {
        canvas.fill_rect(page_rect(), Color::WHITE);
    }
    for object in scene.objects() {
        object.render(canvas, pass);
    }
    if pass == RenderPass::Editor {
        canvas.stroke_rect(page_rect(), SHEET_BORDER_WIDTH, Color::BLACK);
    }
}

impl PageObject {
    /// Paint this object. Selection turns text red; selection or hover
    /// adds a red outline, in the editor pass only.
    pub fn render(&self, canvas: &mut dyn PageCanvas, pass: RenderPass) {
        match self {
            Self::TextBlock { common, text } => {
                let color = text_color(common.selected);
                for line in layout::justify(text, common.bounds, FontRole::Body) {
                    draw_line(canvas, &line, FontRole::Body, color);
                }
            }
            Self::Header { common, text } => {
                let color = text_color(common.selected);
                let line = layout::single_line(text, common.bounds, FontRole::Headline);
                draw_line(canvas, &line, FontRole::Headline, color);
            }
            Self::Image { common, payload } => match (payload, pass) {
                (Some(payload), RenderPass::Editor) => {
                    let (w, h) = payload.display_size();
                    canvas.draw_image(payload.display(), fit_rect(w, h, common.bounds));
                }
                (Some(payload), RenderPass::Export) => {
                    let (w, h) = payload.source().dimensions();
                    canvas.draw_image(payload.source(), fit_rect(w, h, common.bounds));
                }
                (None, RenderPass::Editor) => {
                    canvas.fill_rect(common.bounds, Color::PLACEHOLDER);
                    canvas.stroke_rect(common.bounds, SHEET_BORDER_WIDTH, Color::BLACK);
                }
                // prints stay clean where an image never decoded
                (None, RenderPass::Export) => {}
            },
        }

        if pass == RenderPass::Editor {
            let common = match self {
                Self::TextBlock { common, .. }
                | Self::Header { common, .. }
                | Self::Image { common, .. } => common,
            };
            if common.selected || common.hovered {
                canvas.stroke_rect(common.bounds, OUTLINE_WIDTH, Color::SELECTION);
            }
        }
    }
}

fn text_color(selected: bool) -> Color {
    if selected {
        Color::SELECTION
    } else {
        Color::BLACK
    }
}

fn draw_line(canvas: &mut dyn PageCanvas, line: &layout::Line<'_>, role: FontRole, color: Color) {
    for word in &line.words {
        if word.text.is_empty() {
            continue;
        }
        canvas.draw_word(word.text, Point::new(word.x, line.baseline), role, color);
    }
}

/// Largest aspect-preserving placement of a `w` x `h` image centered
/// inside `bounds`.
fn fit_rect(w: u32, h: u32, bounds: Rect) -> Rect {
    if w == 0 || h == 0 {
        return bounds;
    }
    let scale = (bounds.width() / w as f32).min(bounds.height() / h as f32);
    let fit_w = w as f32 * scale;
    let fit_h = h as f32 * scale;
    Rect::from_xywh(
        bounds.left + (bounds.width() - fit_w) / 2.0,
        bounds.top + (bounds.height() - fit_h) / 2.0,
        fit_w,
        fit_h,
    )
}
