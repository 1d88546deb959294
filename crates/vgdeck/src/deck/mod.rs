pub mod load;
pub mod search;

use std::path::PathBuf;

pub use load::{LoadError, load, parse};

/// A loaded slide deck: the canvas plus the slides in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub canvas: Canvas,
    pub slides: Vec<Slide>,
    /// Directory image names are resolved against.
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub bg: Paint,
    pub fg: Paint,
    pub images: Vec<Image>,
    pub lists: Vec<List>,
    pub texts: Vec<Text>,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            bg: Paint::named("white"),
            fg: Paint::named("black"),
            images: Vec::new(),
            lists: Vec::new(),
            texts: Vec::new(),
        }
    }
}

/// Position and size shared by every slide element, in percent of the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub xp: f64,
    pub yp: f64,
    pub sp: f64,
    pub color: Option<Paint>,
    pub font: Option<Font>,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub at: Placement,
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub at: Placement,
    pub kind: TextKind,
    /// Block width in percent of the canvas width; only `block` text uses it.
    pub wp: f64,
    pub content: String,
}

impl Text {
    /// Physical lines of `plain` and `code` text, split on every line feed.
    /// Blank lines, including those at either end of the element body, are
    /// kept. A CR before the LF is dropped, as XML line-end handling requires.
    pub fn lines(&self) -> Vec<&str> {
        self.content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect()
    }
}

/// An image blitted centered on its position with an explicit pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub at: Placement,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "center" | "middle" | "mid" => Self::Center,
            "end" | "right" => Self::End,
            _ => Self::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListKind {
    #[default]
    Plain,
    Bullet,
}

impl ListKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "bullet" => Self::Bullet,
            _ => Self::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    #[default]
    Plain,
    Code,
    Block,
}

impl TextKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "code" => Self::Code,
            "block" => Self::Block,
            _ => Self::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Font {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl Font {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "serif" => Self::Serif,
            "mono" | "monospace" | "code" => Self::Mono,
            _ => Self::Sans,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sans => "sans",
            Self::Serif => "serif",
            Self::Mono => "mono",
        }
    }
}

/// A color as written in the document: an SVG name or explicit components.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Named(String),
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Paint {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_ascii_lowercase())
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::Rgba { r, g, b, a }
    }

    /// Parse `#rrggbb`, `rgb(r,g,b)` or a color name. Malformed component
    /// forms are kept as names and resolve like any unknown name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                    return Self::rgba(r, g, b, 1.0);
                }
            }
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
            let parts: Vec<Option<u8>> = body.split(',').map(|p| p.trim().parse().ok()).collect();
            if let [Some(r), Some(g), Some(b)] = parts[..] {
                return Self::rgba(r, g, b, 1.0);
            }
        }
        Self::named(s)
    }
}

impl std::fmt::Display for Paint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Rgba { r, g, b, a } if *a >= 1.0 => write!(f, "rgb({r},{g},{b})"),
            Self::Rgba { r, g, b, a } => write!(f, "rgba({r},{g},{b},{a:.2})"),
        }
    }
}

impl Deck {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }
}
