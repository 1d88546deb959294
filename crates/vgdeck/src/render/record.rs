use crate::deck::{Align, Font, Paint};

use super::{DrawCommand, Surface};

/// A [`Surface`] that records every call instead of drawing.
///
/// Text is measured as a fixed advance per character, so layouts computed
/// against it are deterministic.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    published: Vec<Vec<DrawCommand>>,
    advance: f64,
    native: Option<(u32, u32)>,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl DisplayList {
    /// `advance` is the width of one character in multiples of the font size.
    pub fn new(advance: f64) -> Self {
        Self {
            commands: Vec::new(),
            published: Vec::new(),
            advance,
            native: None,
        }
    }

    pub fn with_native_size(mut self, width: u32, height: u32) -> Self {
        self.native = Some((width, height));
        self
    }

    /// Commands of the frame in progress (or the last one, once ended).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Every frame handed over by [`Surface::end_frame`], oldest first.
    pub fn published(&self) -> &[Vec<DrawCommand>] {
        &self.published
    }

    pub fn last_published(&self) -> Option<&[DrawCommand]> {
        self.published.last().map(Vec::as_slice)
    }
}

impl Surface for DisplayList {
    fn begin_frame(&mut self, width: u32, height: u32) {
        self.commands.clear();
        self.commands.push(DrawCommand::Begin { width, height });
    }

    fn end_frame(&mut self) {
        self.published.push(self.commands.clone());
    }

    fn background(&mut self, color: &Paint) {
        self.commands.push(DrawCommand::Background(color.clone()));
    }

    fn fill(&mut self, color: &Paint) {
        self.commands.push(DrawCommand::Fill(color.clone()));
    }

    fn stroke(&mut self, color: &Paint, width: f64) {
        self.commands.push(DrawCommand::Stroke(color.clone(), width));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(DrawCommand::Rect { x, y, w, h });
    }

    fn circle(&mut self, x: f64, y: f64, r: f64) {
        self.commands.push(DrawCommand::Circle { x, y, r });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: Font, size: f64, align: Align) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            align,
        });
    }

    fn text_width(&self, text: &str, _font: Font, size: f64) -> f64 {
        text.chars().count() as f64 * size * self.advance
    }

    fn image(&mut self, x: f64, y: f64, w: u32, h: u32, name: &str) {
        self.commands.push(DrawCommand::Image {
            x,
            y,
            w,
            h,
            name: name.to_string(),
        });
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        self.native
    }
}
