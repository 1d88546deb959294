use crate::deck::{Align, Deck, Font, Paint, Slide};
use crate::layout::{Spacing, place, resolve};

use super::Surface;
use super::slide::draw_slide;

/// Spacing of grid lines, in percent of the canvas.
pub const GRID_STEP: u32 = 10;

const GRID_LINE: Paint = Paint::rgba(211, 211, 211, 0.5);
const GRID_LABEL: Paint = Paint::rgba(128, 128, 128, 1.0);
const IMAGE_CENTER: Paint = Paint::rgba(127, 0, 0, 0.3);
const IMAGE_BOUNDS: Paint = Paint::rgba(255, 0, 0, 0.1);

/// Render slide `index` with a percentage grid and the bounds of its images
/// drawn on top, published as one frame. Each call starts from a fresh frame,
/// so repeating it never stacks grids. An index outside the deck draws nothing.
pub fn render_with_grid<S: Surface + ?Sized>(
    surface: &mut S,
    deck: &Deck,
    index: usize,
    spacing: Spacing,
) {
    let Some(slide) = deck.slide(index) else {
        return;
    };
    if draw_slide(surface, deck, index, spacing) {
        overlay_grid(surface, deck, slide);
        surface.end_frame();
    }
}

fn overlay_grid<S: Surface + ?Sized>(surface: &mut S, deck: &Deck, slide: &Slide) {
    let w = f64::from(deck.canvas.width);
    let h = f64::from(deck.canvas.height);
    let label = w / 100.0;
    let first_x = resolve(w, f64::from(GRID_STEP));
    let first_y = resolve(h, f64::from(GRID_STEP));

    surface.stroke(&GRID_LINE, (label / 4.0).max(1.0));
    surface.fill(&GRID_LABEL);
    for pct in (GRID_STEP..=100).step_by(GRID_STEP as usize) {
        let x = resolve(w, f64::from(pct));
        surface.line(x, 0.0, x, h);
        surface.text(x, first_y, &format!("{pct}%"), Font::Sans, label, Align::Start);

        let y = resolve(h, f64::from(pct));
        surface.line(0.0, y, w, y);
        surface.text(first_x, y, &format!("{pct}%"), Font::Sans, label, Align::Start);
    }

    for image in &slide.images {
        let at = place(deck.canvas, &image.at);
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        surface.fill(&IMAGE_CENTER);
        surface.circle(at.x, at.y, label);
        surface.fill(&IMAGE_BOUNDS);
        surface.rect(at.x - iw / 2.0, at.y - ih / 2.0, iw, ih);
    }
    surface.fill(&slide.fg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Canvas, parse};
    use crate::render::record::DisplayList;
    use crate::render::{DrawCommand, render_slide};

    fn deck() -> Deck {
        parse(
            r#"<deck><slide><image xp="50" yp="50" width="100" height="40" name="x.png"/></slide></deck>"#,
            Canvas {
                width: 1000,
                height: 500,
            },
        )
        .unwrap()
    }

    fn line_count(frame: &[DrawCommand]) -> usize {
        frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    #[test]
    fn test_grid_lines_every_ten_percent() {
        let d = deck();
        let mut list = DisplayList::default();
        render_with_grid(&mut list, &d, 0, Spacing::default());
        assert_eq!(line_count(list.commands()), 20);
        let labels: Vec<String> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.first().map(String::as_str), Some("10%"));
        assert_eq!(labels.last().map(String::as_str), Some("100%"));
    }

    #[test]
    fn test_overlay_keeps_slide_content() {
        let d = deck();
        let mut list = DisplayList::default();
        render_slide(&mut list, &d, 0, Spacing::default());
        let slide_len = list.commands().len();
        render_with_grid(&mut list, &d, 0, Spacing::default());

        assert_eq!(list.published().len(), 2);
        let overlaid = list.last_published().unwrap();
        assert_eq!(&overlaid[..slide_len], &list.published()[0][..]);
        assert!(overlaid.contains(&DrawCommand::Rect {
            x: 450.0,
            y: 230.0,
            w: 100.0,
            h: 40.0
        }));
    }

    #[test]
    fn test_repeated_grid_does_not_stack() {
        let d = deck();
        let mut list = DisplayList::default();
        render_slide(&mut list, &d, 0, Spacing::default());
        for _ in 0..3 {
            render_with_grid(&mut list, &d, 0, Spacing::default());
        }
        assert_eq!(list.published().len(), 4);
        assert_eq!(line_count(list.last_published().unwrap()), 20);
        assert_eq!(list.last_published(), list.published().get(1).map(Vec::as_slice));
    }

    #[test]
    fn test_grid_out_of_range_draws_nothing() {
        let d = deck();
        let mut list = DisplayList::default();
        render_slide(&mut list, &d, 0, Spacing::default());
        let before = list.commands().to_vec();
        render_with_grid(&mut list, &d, 1, Spacing::default());

        assert_eq!(list.published().len(), 1);
        assert_eq!(list.commands(), &before[..]);

        let empty = parse("<deck/>", d.canvas).unwrap();
        render_with_grid(&mut list, &empty, 0, Spacing::default());
        assert_eq!(list.published().len(), 1);
    }
}
