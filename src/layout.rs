//! Word layout for text blocks and headers.
//!
//! Both policies are word-granular; a word is never broken. The engine
//! produces positioned words so the screen raster, the print raster and
//! the PDF sink all draw the exact same geometry.

use crate::fonts::FontRole;
use crate::geometry::Rect;

/// One word placed on a line: the text and the x coordinate of its
/// left edge at the line's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord<'a> {
    pub text: &'a str,
    pub x: f32,
}

/// One laid-out line: its baseline y and the words on it, left to
/// right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub baseline: f32,
    pub words: Vec<PlacedWord<'a>>,
}

/// Greedy justified layout.
///
/// Packs words into a line while the running width plus the next word
/// and one inter-word space still fits the box; on overflow the line is
/// flushed with the leftover width distributed as extra inter-word
/// spacing and the overflowing word starts the next line. The final line
/// is left-aligned, never justified. The first baseline sits at
/// `top + size`; each further line advances by the role's line height.
pub fn justify<'a>(text: &'a str, bounds: Rect, role: FontRole) -> Vec<Line<'a>> {
    let size = role.size();
    let space = role.space_width();
    let line_height = role.line_height();
    let box_width = bounds.width();

    let mut lines = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut pending_width = 0.0;
    let mut baseline = bounds.top + size;

    for word in text.split(' ') {
        let word_width = role.measure(word);
        // A line only flushes once it holds at least one word, so an
        // over-wide first word cannot emit a blank line.
        if pending_width + word_width + space > box_width && !pending.is_empty() {
            lines.push(justified_line(&pending, bounds.left, box_width, baseline, role));
            pending.clear();
            pending_width = 0.0;
            baseline += line_height;
        }
        pending.push(word);
        pending_width += word_width + space;
    }

    if !pending.is_empty() {
        lines.push(left_aligned_line(&pending, bounds.left, baseline, role));
    }
    lines
}

/// Single left-aligned line for headers: every word at one baseline,
/// advancing by word width plus a space. Never wraps.
pub fn single_line<'a>(text: &'a str, bounds: Rect, role: FontRole) -> Line<'a> {
    let words: Vec<&str> = text.split(' ').collect();
    left_aligned_line(&words, bounds.left, bounds.top + role.size(), role)
}

fn justified_line<'a>(
    words: &[&'a str],
    left: f32,
    box_width: f32,
    baseline: f32,
    role: FontRole,
) -> Line<'a> {
    let total: f32 = words.iter().map(|w| role.measure(w)).sum();
    let gaps = words.len().saturating_sub(1).max(1) as f32;
    let extra = (box_width - total) / gaps;

    let mut x = left;
    let mut placed = Vec::with_capacity(words.len());
    for word in words {
        placed.push(PlacedWord { text: word, x });
        x += role.measure(word) + extra;
    }
    Line {
        baseline,
        words: placed,
    }
}

fn left_aligned_line<'a>(words: &[&'a str], left: f32, baseline: f32, role: FontRole) -> Line<'a> {
    let space = role.space_width();
    let mut x = left;
    let mut placed = Vec::with_capacity(words.len());
    for word in words {
        placed.push(PlacedWord { text: word, x });
        x += role.measure(word) + space;
    }
    Line {
        baseline,
        words: placed,
    }
}
