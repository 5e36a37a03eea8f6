//! Font roles and measurement.
//!
//! Layout and export measure text through built-in per-mille width
//! tables in the style of the Base-14 AFM metrics, so line breaks and
//! PDF output are identical on every machine regardless of installed
//! fonts. TrueType faces are optional and only used by the raster
//! canvas to outline glyphs; they never influence measurement.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

/// Body copy: 9 pt at the page's 300 dpi.
pub const BODY_SIZE: f32 = 37.5;
/// Headlines: 48 pt at the page's 300 dpi.
pub const HEADLINE_SIZE: f32 = 200.0;

/// The two text styles shipped by the editor. Text blocks use `Body`,
/// headers use `Headline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Body,
    Headline,
}

impl FontRole {
    pub fn size(self) -> f32 {
        match self {
            FontRole::Body => BODY_SIZE,
            FontRole::Headline => HEADLINE_SIZE,
        }
    }

    /// PostScript name of the built-in font backing this role.
    pub fn family(self) -> &'static str {
        match self {
            FontRole::Body => "Helvetica",
            FontRole::Headline => "Times-Bold",
        }
    }

    pub fn metrics(self) -> &'static FontMetrics {
        match self {
            FontRole::Body => &HELVETICA,
            FontRole::Headline => &TIMES_BOLD,
        }
    }

    pub fn measure(self, text: &str) -> f32 {
        self.metrics().measure(text, self.size())
    }

    pub fn space_width(self) -> f32 {
        self.metrics().space_width(self.size())
    }

    pub fn line_height(self) -> f32 {
        self.metrics().line_height(self.size())
    }
}

/// Per-mille metrics for one face: advance widths over printable
/// ASCII, a short Latin-1 extension, and the vertical metrics needed
/// for line spacing.
pub struct FontMetrics {
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    default_width: u16,
    ascii: [u16; 95],
    extended: &'static [(char, u16)],
}

impl FontMetrics {
    /// Advance width of one character in per-mille of the font size.
    pub fn advance(&self, c: char) -> u16 {
        let code = c as u32;
        if (0x20..=0x7e).contains(&code) {
            return self.ascii[(code - 0x20) as usize];
        }
        self.extended
            .iter()
            .find(|(e, _)| *e == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.default_width)
    }

    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let per_mille: u32 = text.chars().map(|c| self.advance(c) as u32).sum();
        per_mille as f32 * size / 1000.0
    }

    pub fn space_width(&self, size: f32) -> f32 {
        self.advance(' ') as f32 * size / 1000.0
    }

    /// Recommended baseline-to-baseline distance.
    pub fn line_height(&self, size: f32) -> f32 {
        (self.ascent as i32 - self.descent as i32 + self.line_gap as i32) as f32 * size / 1000.0
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // 0x20 space .. 0x2f slash
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30 digits, punctuation .. 0x3f
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40 at, A .. O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50 P .. Z, brackets
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60 grave, a .. o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70 p .. z, braces, tilde
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_EXTENDED: &[(char, u16)] = &[
    ('Ä', 667),
    ('Ö', 778),
    ('Ü', 722),
    ('ä', 556),
    ('ö', 556),
    ('ü', 556),
    ('ß', 611),
    ('à', 556),
    ('è', 556),
    ('é', 556),
    ('ç', 500),
    ('\u{2013}', 556),
    ('\u{2014}', 1000),
    ('\u{2018}', 222),
    ('\u{2019}', 222),
    ('\u{201A}', 222),
    ('\u{201C}', 333),
    ('\u{201D}', 333),
    ('\u{201E}', 333),
    ('€', 556),
];

/// Helvetica, per the AFM: ascender 718, descender -207.
static HELVETICA: FontMetrics = FontMetrics {
    ascent: 718,
    descent: -207,
    line_gap: 225,
    default_width: 556,
    ascii: HELVETICA_WIDTHS,
    extended: HELVETICA_EXTENDED,
};

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    // 0x20 space .. 0x2f slash
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    // 0x30 digits, punctuation .. 0x3f
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    // 0x40 at, A .. O
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    // 0x50 P .. Z, brackets
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    // 0x60 grave, a .. o
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    // 0x70 p .. z, braces, tilde
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_BOLD_EXTENDED: &[(char, u16)] = &[
    ('Ä', 722),
    ('Ö', 778),
    ('Ü', 722),
    ('ä', 500),
    ('ö', 500),
    ('ü', 556),
    ('ß', 556),
    ('à', 500),
    ('è', 444),
    ('é', 444),
    ('ç', 444),
    ('\u{2013}', 500),
    ('\u{2014}', 1000),
    ('\u{2018}', 333),
    ('\u{2019}', 333),
    ('\u{201A}', 333),
    ('\u{201C}', 500),
    ('\u{201D}', 500),
    ('\u{201E}', 500),
    ('€', 500),
];

/// Times-Bold, per the AFM: ascender 683, descender -217.
static TIMES_BOLD: FontMetrics = FontMetrics {
    ascent: 683,
    descent: -217,
    line_gap: 250,
    default_width: 500,
    ascii: TIMES_BOLD_WIDTHS,
    extended: TIMES_BOLD_EXTENDED,
};

/// An owned TrueType file, parsed on demand. `ttf_parser::Face`
/// borrows the byte buffer, so the face is rebuilt per use instead of
/// stored alongside its data.
pub struct FontFace {
    data: Vec<u8>,
}

impl FontFace {
    /// Reads and validates a TrueType file.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read(path).with_context(|| format!("read font file {}", path.display()))?;
        ttf_parser::Face::parse(&data, 0)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("parse font file {}", path.display()))?;
        Ok(FontFace { data })
    }

    /// Runs `f` against the parsed face. Returns `None` only if the
    /// data stopped parsing, which cannot happen for faces built by
    /// [`FontFace::load`].
    pub fn with_face<R>(&self, f: impl FnOnce(&ttf_parser::Face) -> R) -> Option<R> {
        ttf_parser::Face::parse(&self.data, 0).ok().map(|face| f(&face))
    }
}

const BODY_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const HEADLINE_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Bold.ttf",
    "C:\\Windows\\Fonts\\timesbd.ttf",
];

/// Optional TrueType faces for the raster canvas, one per role.
/// Without a face, raster text is skipped (layout and PDF output are
/// unaffected).
#[derive(Default)]
pub struct FontLibrary {
    body: Option<FontFace>,
    headline: Option<FontFace>,
}

impl FontLibrary {
    /// A library with no faces. Raster canvases built from it draw
    /// boxes and outlines but no glyphs.
    pub fn empty() -> Self {
        FontLibrary::default()
    }

    /// Probes explicit overrides first, then a short list of common
    /// system font locations per role. Missing faces are logged, not
    /// errors.
    pub fn discover(body_override: Option<&Path>, headline_override: Option<&Path>) -> Self {
        let body = Self::probe(FontRole::Body, body_override, BODY_CANDIDATES);
        let headline = Self::probe(FontRole::Headline, headline_override, HEADLINE_CANDIDATES);
        FontLibrary { body, headline }
    }

    fn probe(role: FontRole, override_path: Option<&Path>, candidates: &[&str]) -> Option<FontFace> {
        if let Some(path) = override_path {
            match FontFace::load(path) {
                Ok(face) => {
                    debug!("{role:?} face: {}", path.display());
                    return Some(face);
                }
                Err(e) => warn!("configured {role:?} font unusable: {e:#}"),
            }
        }
        for candidate in candidates {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            if let Ok(face) = FontFace::load(path) {
                debug!("{role:?} face: {candidate}");
                return Some(face);
            }
        }
        warn!("no {role:?} face found, raster output will omit glyphs");
        None
    }

    pub fn face(&self, role: FontRole) -> Option<&FontFace> {
        match role {
            FontRole::Body => self.body.as_ref(),
            FontRole::Headline => self.headline.as_ref(),
        }
    }

    pub fn has_face(&self, role: FontRole) -> bool {
        self.face(role).is_some()
    }
}
