use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::deck::{self, Canvas, Deck, Placement};
use crate::layout::Spacing;
use crate::render::record::DisplayList;
use crate::render::render_slide;

pub fn run(files: &[PathBuf], fallback: Canvas, spacing: Spacing) -> Result<()> {
    for file in files {
        let deck = deck::load(file, fallback)
            .with_context(|| format!("Failed to load {}", file.display()))?;
        print!("{}", describe(&deck, spacing));
    }
    Ok(())
}

fn placement(at: &Placement) -> String {
    let mut out = format!("xp={} yp={} sp={} align={:?}", at.xp, at.yp, at.sp, at.align);
    if let Some(color) = &at.color {
        let _ = write!(out, " color={color}");
    }
    if let Some(font) = at.font {
        let _ = write!(out, " font={}", font.name());
    }
    out
}

/// The deck structure followed by the draw commands each slide produces.
pub fn describe(deck: &Deck, spacing: Spacing) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}x{}, {} slide(s)",
        "canvas".bold(),
        deck.canvas.width,
        deck.canvas.height,
        deck.slide_count()
    );

    let mut surface = DisplayList::default();
    for (index, slide) in deck.slides.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} bg={} fg={}",
            format!("slide {}", index + 1).cyan().bold(),
            slide.bg,
            slide.fg
        );
        for image in &slide.images {
            let _ = writeln!(
                out,
                "  image {} {}x{} {}",
                image.name,
                image.width,
                image.height,
                placement(&image.at)
            );
        }
        for list in &slide.lists {
            let _ = writeln!(out, "  list {:?} {}", list.kind, placement(&list.at));
            for item in &list.items {
                let _ = writeln!(out, "    - {item}");
            }
        }
        for text in &slide.texts {
            let _ = writeln!(
                out,
                "  text {:?} wp={} {}",
                text.kind,
                text.wp,
                placement(&text.at)
            );
            for line in text.lines() {
                let _ = writeln!(out, "    | {line}");
            }
        }

        render_slide(&mut surface, deck, index, spacing);
        let _ = writeln!(out, "  {}", "draw:".dimmed());
        for command in surface.commands() {
            let _ = writeln!(out, "    {command}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_structure_and_draws() {
        colored::control::set_override(false);
        let src = r#"<deck><canvas width="100" height="100"/>
            <slide bg="navy"><list xp="10" yp="90" sp="5"><li>one</li></list>
            <text xp="50" yp="10" font="mono">hi</text></slide></deck>"#;
        let deck = deck::parse(src, Canvas { width: 1, height: 1 }).unwrap();
        let out = describe(&deck, Spacing::default());

        assert!(out.starts_with("canvas 100x100, 1 slide(s)"));
        assert!(out.contains("slide 1 bg=navy fg=black"));
        assert!(out.contains("    - one"));
        assert!(out.contains("font=mono"));
        assert!(out.contains("    | hi"));
        assert!(out.contains("draw:"));
    }
}
