//! Mapping of percentage coordinates onto the canvas, and word wrapping.

use crate::deck::{Canvas, Placement};

/// Line advance of list items, in multiples of the font size.
pub const LIST_ADVANCE: f64 = 2.0;
/// Line advance of `plain` and `code` text, in multiples of the font size.
pub const TEXT_ADVANCE: f64 = 1.8;
/// Horizontal room reserved for a bullet, in multiples of the font size.
pub const BULLET_INDENT: f64 = 1.2;

/// `pct` percent of `dim`.
pub fn resolve(dim: f64, pct: f64) -> f64 {
    (pct / 100.0) * dim
}

/// An element's placement resolved to canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Font size or other size; always relative to the canvas width.
    pub size: f64,
}

pub fn place(canvas: Canvas, at: &Placement) -> Point {
    let width = f64::from(canvas.width);
    Point {
        x: resolve(width, at.xp),
        y: resolve(f64::from(canvas.height), at.yp),
        size: resolve(width, at.sp),
    }
}

/// Spacing used when reflowing `block` text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Gap between words, as a multiple of the width of "m".
    pub word: f64,
    /// Distance between wrapped lines, as a multiple of the font size.
    pub line: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            word: 0.3,
            line: TEXT_ADVANCE,
        }
    }
}

/// A word positioned by [`wrap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedWord<'a> {
    pub word: &'a str,
    pub x: f64,
    pub y: f64,
}

/// Flow the whitespace separated words of `text` left to right from `origin`
/// within `width`, dropping one `leading` (y grows upward) whenever the next
/// word's advance would pass the right edge. A word that is wider than the
/// whole block still gets a line of its own rather than an empty line before
/// it.
pub fn wrap<'a>(
    text: &'a str,
    origin: (f64, f64),
    width: f64,
    leading: f64,
    gap: f64,
    mut measure: impl FnMut(&str) -> f64,
) -> Vec<PlacedWord<'a>> {
    let (x0, y0) = origin;
    let edge = x0 + width;
    let (mut x, mut y) = (x0, y0);
    let mut placed = Vec::new();

    for word in text.split_whitespace() {
        let advance = measure(word) + gap;
        // Break before a word that would cross the edge, never before the
        // first word of a line, so an overlong word sits alone.
        if x > x0 && x + advance > edge {
            x = x0;
            y -= leading;
        }
        placed.push(PlacedWord { word, x, y });
        x += advance;
    }
    placed
}
