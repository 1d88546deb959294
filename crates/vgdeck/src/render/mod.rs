pub mod color;
pub mod grid;
pub mod record;
pub mod slide;

use crate::deck::{Align, Font, Paint};

pub use slide::render_slide;

/// The drawing backend slides are rendered through.
///
/// Coordinates are canvas units with the origin in the bottom-left corner and
/// y growing upward. Fill and stroke colors are state: every shape and text
/// call uses the most recently set color.
pub trait Surface {
    /// Start a new frame of the given canvas size, discarding the previous one.
    fn begin_frame(&mut self, width: u32, height: u32);
    /// Publish everything drawn since [`Surface::begin_frame`]. May be called
    /// again after further drawing to publish an overlay.
    fn end_frame(&mut self);

    fn background(&mut self, color: &Paint);
    fn fill(&mut self, color: &Paint);
    fn stroke(&mut self, color: &Paint, width: f64);

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn circle(&mut self, x: f64, y: f64, r: f64);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    /// Draw `text` with its baseline at `y`, anchored at `x` per `align`.
    fn text(&mut self, x: f64, y: f64, text: &str, font: Font, size: f64, align: Align);
    fn text_width(&self, text: &str, font: Font, size: f64) -> f64;
    /// Blit the named image with its bottom-left corner at `(x, y)`.
    fn image(&mut self, x: f64, y: f64, w: u32, h: u32, name: &str);

    /// Size of the display in pixels, if the backend knows it.
    fn native_size(&self) -> Option<(u32, u32)>;
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Begin {
        width: u32,
        height: u32,
    },
    Background(Paint),
    Fill(Paint),
    Stroke(Paint, f64),
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Circle {
        x: f64,
        y: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: Font,
        size: f64,
        align: Align,
    },
    Image {
        x: f64,
        y: f64,
        w: u32,
        h: u32,
        name: String,
    },
}

impl std::fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin { width, height } => write!(f, "begin {width}x{height}"),
            Self::Background(c) => write!(f, "background {c}"),
            Self::Fill(c) => write!(f, "fill {c}"),
            Self::Stroke(c, w) => write!(f, "stroke {c} {w:.1}"),
            Self::Rect { x, y, w, h } => write!(f, "rect ({x:.1}, {y:.1}) {w:.1}x{h:.1}"),
            Self::Circle { x, y, r } => write!(f, "circle ({x:.1}, {y:.1}) r={r:.1}"),
            Self::Line { x1, y1, x2, y2 } => {
                write!(f, "line ({x1:.1}, {y1:.1}) -> ({x2:.1}, {y2:.1})")
            }
            Self::Text {
                x,
                y,
                text,
                font,
                size,
                align,
            } => write!(
                f,
                "text ({x:.1}, {y:.1}) {}/{size:.1} {align:?} {text:?}",
                font.name()
            ),
            Self::Image { x, y, w, h, name } => {
                write!(f, "image ({x:.1}, {y:.1}) {w}x{h} {name}")
            }
        }
    }
}
