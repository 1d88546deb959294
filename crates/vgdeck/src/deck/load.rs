use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    Align, Canvas, Deck, Font, Image, List, ListKind, Paint, Placement, Slide, Text, TextKind,
};

/// Why a deck document could not be turned into a [`Deck`].
///
/// No partially built deck is ever returned next to an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed deck near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("invalid {attribute}=\"{value}\" on <{element}>")]
    Attribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("<{0}> is never closed")]
    Unclosed(String),

    #[error("document contains no deck")]
    Empty,

    #[error("canvas has no usable size ({width}x{height})")]
    Canvas { width: u32, height: u32 },
}

/// Read and parse the deck at `path`. A canvas dimension declared as zero (or
/// left out) is taken from `fallback`.
pub fn load(path: &Path, fallback: Canvas) -> Result<Deck, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deck = parse(&source, fallback)?;
    deck.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    debug!(
        path = %path.display(),
        slides = deck.slides.len(),
        width = deck.canvas.width,
        height = deck.canvas.height,
        "loaded deck"
    );
    Ok(deck)
}

/// Parse deck markup held in memory.
pub fn parse(source: &str, fallback: Canvas) -> Result<Deck, LoadError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut builder = Builder::default();
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|source| LoadError::Xml {
            position: reader.buffer_position() as u64,
            source,
        })?;
        match event {
            Event::Start(e) => {
                let name = element_name(&e);
                builder.open(&name, &e)?;
                open.push(name);
                seen_root = true;
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                builder.open(&name, &e)?;
                builder.close(&name);
                seen_root = true;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                open.pop();
                builder.close(&name);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|source| LoadError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
                builder.characters(&text);
            }
            Event::CData(c) => {
                builder.characters(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(LoadError::Unclosed(name));
    }
    if !seen_root {
        return Err(LoadError::Empty);
    }

    let (width, height) = builder.canvas;
    let canvas = Canvas {
        width: if width == 0 { fallback.width } else { width },
        height: if height == 0 { fallback.height } else { height },
    };
    if canvas.width == 0 || canvas.height == 0 {
        return Err(LoadError::Canvas {
            width: canvas.width,
            height: canvas.height,
        });
    }

    Ok(Deck {
        canvas,
        slides: builder.slides,
        base_dir: PathBuf::new(),
    })
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Accumulates elements while the reader walks the document. Elements that
/// appear outside their expected parent are ignored.
#[derive(Default)]
struct Builder {
    canvas: (u32, u32),
    slides: Vec<Slide>,
    slide: Option<Slide>,
    list: Option<List>,
    item: Option<String>,
    text: Option<Text>,
}

impl Builder {
    fn open(&mut self, name: &str, e: &BytesStart<'_>) -> Result<(), LoadError> {
        let attrs = Attrs::read(name, e)?;
        match name {
            "canvas" => {
                self.canvas = (attrs.pixels("width")?, attrs.pixels("height")?);
            }
            "slide" => {
                let mut slide = Slide::default();
                if let Some(bg) = attrs.color("bg") {
                    slide.bg = bg;
                }
                if let Some(fg) = attrs.color("fg") {
                    slide.fg = fg;
                }
                self.slide = Some(slide);
            }
            "list" if self.slide.is_some() => {
                self.list = Some(List {
                    at: attrs.placement()?,
                    kind: ListKind::from_name(attrs.get("type").unwrap_or_default()),
                    items: Vec::new(),
                });
            }
            "li" if self.list.is_some() => self.item = Some(String::new()),
            "text" if self.slide.is_some() => {
                self.text = Some(Text {
                    at: attrs.placement()?,
                    kind: TextKind::from_name(attrs.get("type").unwrap_or_default()),
                    wp: attrs.number("wp")?,
                    content: String::new(),
                });
            }
            "image" => {
                if let Some(slide) = self.slide.as_mut() {
                    slide.images.push(Image {
                        at: attrs.placement()?,
                        width: attrs.pixels("width")?,
                        height: attrs.pixels("height")?,
                        name: attrs.get("name").unwrap_or_default().to_string(),
                    });
                }
            }
            other => trace!(element = other, "ignoring element"),
        }
        Ok(())
    }

    fn close(&mut self, name: &str) {
        match name {
            "slide" => {
                if let Some(slide) = self.slide.take() {
                    self.slides.push(slide);
                }
            }
            "list" => {
                if let (Some(list), Some(slide)) = (self.list.take(), self.slide.as_mut()) {
                    slide.lists.push(list);
                }
            }
            "li" => {
                if let (Some(item), Some(list)) = (self.item.take(), self.list.as_mut()) {
                    list.items.push(item);
                }
            }
            "text" => {
                if let (Some(text), Some(slide)) = (self.text.take(), self.slide.as_mut()) {
                    slide.texts.push(text);
                }
            }
            _ => {}
        }
    }

    fn characters(&mut self, chars: &str) {
        if let Some(item) = self.item.as_mut() {
            item.push_str(chars);
        } else if let Some(text) = self.text.as_mut() {
            text.content.push_str(chars);
        }
    }
}

/// The attributes of one element, unescaped.
struct Attrs<'n> {
    element: &'n str,
    pairs: Vec<(String, String)>,
}

impl<'n> Attrs<'n> {
    fn read(element: &'n str, e: &BytesStart<'_>) -> Result<Self, LoadError> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| LoadError::Xml {
                position: 0,
                source: err.into(),
            })?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|source| LoadError::Xml {
                    position: 0,
                    source,
                })?
                .into_owned();
            pairs.push((key, value));
        }
        Ok(Self { element, pairs })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn invalid(&self, key: &str, value: &str) -> LoadError {
        LoadError::Attribute {
            element: self.element.to_string(),
            attribute: key.to_string(),
            value: value.to_string(),
        }
    }

    /// A percentage or other real number; absent or blank means zero.
    fn number(&self, key: &str) -> Result<f64, LoadError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(0.0),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| self.invalid(key, v)),
        }
    }

    /// A non-negative pixel count; absent or blank means zero.
    fn pixels(&self, key: &str) -> Result<u32, LoadError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(0),
            Some(v) => v.parse::<u32>().map_err(|_| self.invalid(key, v)),
        }
    }

    fn color(&self, key: &str) -> Option<Paint> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .map(Paint::parse)
    }

    fn placement(&self) -> Result<Placement, LoadError> {
        Ok(Placement {
            xp: self.number("xp")?,
            yp: self.number("yp")?,
            sp: self.number("sp")?,
            color: self.color("color"),
            font: self
                .get("font")
                .filter(|v| !v.trim().is_empty())
                .map(Font::from_name),
            align: Align::from_name(self.get("align").unwrap_or_default()),
        })
    }
}
