//! The drawable objects that live on the page.

use crate::fonts::FontRole;
use crate::geometry::{Point, Rect};
use crate::images::ImagePayload;

/// Half-width of the square pickup zone around each corner, in
/// document units.
pub const HANDLE_THRESHOLD: f32 = 30.0;

/// Smallest edge an object can be resized down to, in document units.
pub const MIN_SIZE: f32 = 1.0;

/// Corner resize handles. Picking checks all four, but only the
/// bottom-right corner currently moves anything; grabbing another
/// corner holds the object until release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// State shared by every object kind.
#[derive(Debug, Clone, Default)]
pub struct ObjectCommon {
    pub bounds: Rect,
    pub selected: bool,
    pub hovered: bool,
}

/// One object on the page.
#[derive(Debug, Clone)]
pub enum PageObject {
    /// Multi-line body text, justified into its bounds.
    TextBlock { common: ObjectCommon, text: String },
    /// Single-line display text at headline size.
    Header { common: ObjectCommon, text: String },
    /// A raster image. `payload` is `None` when the file could not be
    /// decoded; the object still participates in every interaction.
    Image {
        common: ObjectCommon,
        payload: Option<ImagePayload>,
    },
}

impl PageObject {
    pub fn text_block(text: impl Into<String>, bounds: Rect) -> Self {
        Self::TextBlock {
            common: ObjectCommon {
                bounds,
                ..Default::default()
            },
            text: text.into(),
        }
    }

    pub fn header(text: impl Into<String>, bounds: Rect) -> Self {
        Self::Header {
            common: ObjectCommon {
                bounds,
                ..Default::default()
            },
            text: text.into(),
        }
    }

    pub fn image(payload: Option<ImagePayload>, bounds: Rect) -> Self {
        Self::Image {
            common: ObjectCommon {
                bounds,
                ..Default::default()
            },
            payload,
        }
    }

    fn common(&self) -> &ObjectCommon {
        match self {
            Self::TextBlock { common, .. }
            | Self::Header { common, .. }
            | Self::Image { common, .. } => common,
        }
    }

    fn common_mut(&mut self) -> &mut ObjectCommon {
        match self {
            Self::TextBlock { common, .. }
            | Self::Header { common, .. }
            | Self::Image { common, .. } => common,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.common().bounds
    }

    pub fn is_selected(&self) -> bool {
        self.common().selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.common_mut().selected = selected;
    }

    pub fn is_hovered(&self) -> bool {
        self.common().hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.common_mut().hovered = hovered;
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TextBlock { .. } => "text",
            Self::Header { .. } => "header",
            Self::Image { .. } => "image",
        }
    }

    /// The typeface role a text kind draws with; `None` for images.
    pub fn font_role(&self) -> Option<FontRole> {
        match self {
            Self::TextBlock { .. } => Some(FontRole::Body),
            Self::Header { .. } => Some(FontRole::Headline),
            Self::Image { .. } => None,
        }
    }

    /// Whether a document-space point falls inside the object. Edges
    /// count as inside.
    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Which corner handle, if any, a document-space point picks up.
    /// Corners are tried bottom-right first; overlapping zones on a
    /// small object resolve in that fixed order.
    pub fn handle_at(&self, point: Point) -> Option<Handle> {
        let b = self.bounds();
        let corners = [
            (Handle::BottomRight, Point::new(b.right, b.bottom)),
            (Handle::BottomLeft, Point::new(b.left, b.bottom)),
            (Handle::TopRight, Point::new(b.right, b.top)),
            (Handle::TopLeft, Point::new(b.left, b.top)),
        ];
        corners.iter().find_map(|&(handle, corner)| {
            let near = (point.x - corner.x).abs() <= HANDLE_THRESHOLD
                && (point.y - corner.y).abs() <= HANDLE_THRESHOLD;
            near.then_some(handle)
        })
    }

    /// Move the object by a document-space delta.
    pub fn translate(&mut self, delta: Point) {
        self.common_mut().bounds.offset(delta);
    }

    /// Drag a corner handle to `target`. Only the bottom-right corner
    /// changes geometry; the others are accepted and ignored.
    pub fn resize(&mut self, target: Point, handle: Handle) {
        match handle {
            Handle::BottomRight => self.resize_bottom_right(target),
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft => {}
        }
    }

    fn resize_bottom_right(&mut self, target: Point) {
        let aspect = match self {
            Self::Image {
                payload: Some(payload),
                ..
            } => Some(payload.aspect_ratio()),
            _ => None,
        };
        let bounds = &mut self.common_mut().bounds;

        match aspect {
            // Aspect-locked: follow the pointer's x, and switch to
            // height-driven sizing when the implied height would push
            // the bottom edge past the pointer.
            Some(ratio) => {
                let mut new_w = (target.x - bounds.left).max(MIN_SIZE);
                let mut new_h = new_w / ratio;
                if bounds.top + new_h > target.y {
                    new_h = (target.y - bounds.top).max(MIN_SIZE);
                    new_w = (new_h * ratio).max(MIN_SIZE);
                }
                bounds.right = bounds.left + new_w;
                bounds.bottom = bounds.top + new_h;
                let (w, h) = (new_w, new_h);
                if let Self::Image {
                    payload: Some(payload),
                    ..
                } = self
                {
                    payload.regenerate_display(w, h);
                }
            }
            // Free resize for text kinds and undecoded images.
            None => {
                bounds.right = target.x.max(bounds.left + MIN_SIZE);
                bounds.bottom = target.y.max(bounds.top + MIN_SIZE);
            }
        }
    }
}
