use tracing::trace;

use crate::deck::{Align, Canvas, Deck, Font, List, ListKind, Paint, Slide, Text, TextKind};
use crate::layout::{self, BULLET_INDENT, LIST_ADVANCE, Spacing, TEXT_ADVANCE, place, resolve};

use super::Surface;

const CODE_BACKGROUND: Paint = Paint::rgba(240, 240, 240, 1.0);

/// Render slide `index` of `deck` as one frame. An index outside the deck
/// draws nothing at all.
pub fn render_slide<S: Surface + ?Sized>(
    surface: &mut S,
    deck: &Deck,
    index: usize,
    spacing: Spacing,
) {
    if draw_slide(surface, deck, index, spacing) {
        surface.end_frame();
    }
}

/// Start a frame and draw slide `index` into it without publishing it.
/// Returns false, having touched nothing, when the index is out of range.
pub(crate) fn draw_slide<S: Surface + ?Sized>(
    surface: &mut S,
    deck: &Deck,
    index: usize,
    spacing: Spacing,
) -> bool {
    let Some(slide) = deck.slide(index) else {
        trace!(index, slides = deck.slide_count(), "slide index out of range");
        return false;
    };
    let canvas = deck.canvas;

    surface.begin_frame(canvas.width, canvas.height);
    surface.background(&slide.bg);
    surface.fill(&slide.fg);

    for image in &slide.images {
        let at = place(canvas, &image.at);
        let name = deck.base_dir.join(&image.name);
        surface.image(
            at.x - f64::from(image.width) / 2.0,
            at.y - f64::from(image.height) / 2.0,
            image.width,
            image.height,
            &name.to_string_lossy(),
        );
    }
    for list in &slide.lists {
        draw_list(surface, canvas, slide, list);
    }
    for text in &slide.texts {
        draw_text(surface, canvas, slide, text, spacing);
    }

    surface.fill(&slide.fg);
    true
}

fn draw_list<S: Surface + ?Sized>(surface: &mut S, canvas: Canvas, slide: &Slide, list: &List) {
    let at = place(canvas, &list.at);
    let font = list.at.font.unwrap_or_default();
    let bullet = list.kind == ListKind::Bullet;
    let indent = if bullet { BULLET_INDENT * at.size } else { 0.0 };

    surface.fill(list.at.color.as_ref().unwrap_or(&slide.fg));
    let mut y = at.y;
    for item in &list.items {
        if bullet {
            let r = at.size / 2.0;
            surface.circle(at.x, y + r, r);
        }
        surface.text(at.x + indent, y, item, font, at.size, list.at.align);
        y -= LIST_ADVANCE * at.size;
    }
}

fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    canvas: Canvas,
    slide: &Slide,
    text: &Text,
    spacing: Spacing,
) {
    let at = place(canvas, &text.at);
    let color = text.at.color.as_ref().unwrap_or(&slide.fg);
    let font = text.at.font.unwrap_or(match text.kind {
        TextKind::Code => Font::Mono,
        _ => Font::Sans,
    });

    if text.kind == TextKind::Block {
        let width = if text.wp > 0.0 {
            resolve(f64::from(canvas.width), text.wp)
        } else {
            f64::from(canvas.width) - at.x
        };
        let gap = spacing.word * surface.text_width("m", font, at.size);
        let words = layout::wrap(
            &text.content,
            (at.x, at.y),
            width,
            at.size * spacing.line,
            gap,
            |w| surface.text_width(w, font, at.size),
        );
        surface.fill(color);
        for w in words {
            surface.text(w.x, w.y, w.word, font, at.size, Align::Start);
        }
        return;
    }

    let lines = text.lines();
    let leading = TEXT_ADVANCE * at.size;
    if text.kind == TextKind::Code && !lines.is_empty() {
        let depth = lines.len() as f64 * leading;
        let width = if text.wp > 0.0 {
            resolve(f64::from(canvas.width), text.wp)
        } else {
            lines
                .iter()
                .map(|l| surface.text_width(l, font, at.size))
                .fold(0.0, f64::max)
        };
        let left = match text.at.align {
            Align::Start => at.x,
            Align::Center => at.x - width / 2.0,
            Align::End => at.x - width,
        };
        let pad = at.size / 2.0;
        surface.fill(&CODE_BACKGROUND);
        surface.rect(
            left - pad,
            at.y + at.size - depth,
            width + 2.0 * pad,
            depth + pad,
        );
    }

    surface.fill(color);
    let mut y = at.y;
    for line in lines {
        if !line.is_empty() {
            surface.text(at.x, y, line, font, at.size, text.at.align);
        }
        y -= leading;
    }
}
