//! On-screen backend: an eframe window that paints published display lists.
//!
//! The controller thread draws into an [`EguiSurface`], which records the
//! frame and hands it over on `end_frame`. The window thread only ever reads
//! the last finished frame.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Rect, Stroke};
use tracing::{debug, warn};

use crate::deck::{Align, Font, Paint};
use crate::render::color::{self, Rgba};
use crate::render::{DrawCommand, Surface};

type Frame = Arc<Mutex<Vec<DrawCommand>>>;

/// The controller, started once the window knows the monitor size.
pub type Controller = Box<dyn FnOnce(EguiSurface) + Send + 'static>;

fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (c.a * 255.0).round() as u8)
}

fn font_id(font: Font, size: f32) -> FontId {
    let family = match font {
        Font::Mono => FontFamily::Monospace,
        Font::Sans | Font::Serif => FontFamily::Proportional,
    };
    FontId::new(size, family)
}

/// Maps canvas units (origin bottom-left, y up) into a screen rectangle,
/// preserving the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Letterbox {
    origin: Pos2,
    scale: f32,
    width: f32,
    height: f32,
}

impl Letterbox {
    fn fit(width: u32, height: u32, screen: Rect) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let scale = (screen.width() / w).min(screen.height() / h);
        let origin = Pos2::new(
            screen.center().x - w * scale / 2.0,
            screen.center().y - h * scale / 2.0,
        );
        Self {
            origin,
            scale,
            width: w,
            height: h,
        }
    }

    fn point(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(
            self.origin.x + x as f32 * self.scale,
            self.origin.y + (self.height - y as f32) * self.scale,
        )
    }

    /// Screen rectangle of a canvas rectangle given by its bottom-left corner.
    fn rect(&self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_two_pos(self.point(x, y + h), self.point(x + w, y))
    }

    fn canvas(&self) -> Rect {
        self.rect(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    fn length(&self, d: f64) -> f32 {
        d as f32 * self.scale
    }
}

/// [`Surface`] for the controller thread; frames are shown by [`Viewer`].
pub struct EguiSurface {
    ctx: egui::Context,
    frame: Frame,
    pending: Vec<DrawCommand>,
    native: Option<(u32, u32)>,
}

impl EguiSurface {
    fn new(ctx: egui::Context, frame: Frame, native: Option<(u32, u32)>) -> Self {
        Self {
            ctx,
            frame,
            pending: Vec::new(),
            native,
        }
    }

    /// Ask the window to close.
    pub fn close(&self) {
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        self.ctx.request_repaint();
    }
}

impl Surface for EguiSurface {
    fn begin_frame(&mut self, width: u32, height: u32) {
        self.pending.clear();
        self.pending.push(DrawCommand::Begin { width, height });
    }

    fn end_frame(&mut self) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        *frame = self.pending.clone();
        drop(frame);
        self.ctx.request_repaint();
    }

    fn background(&mut self, color: &Paint) {
        self.pending.push(DrawCommand::Background(color.clone()));
    }

    fn fill(&mut self, color: &Paint) {
        self.pending.push(DrawCommand::Fill(color.clone()));
    }

    fn stroke(&mut self, color: &Paint, width: f64) {
        self.pending.push(DrawCommand::Stroke(color.clone(), width));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.pending.push(DrawCommand::Rect { x, y, w, h });
    }

    fn circle(&mut self, x: f64, y: f64, r: f64) {
        self.pending.push(DrawCommand::Circle { x, y, r });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.pending.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: Font, size: f64, align: Align) {
        self.pending.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            align,
        });
    }

    fn text_width(&self, text: &str, font: Font, size: f64) -> f64 {
        // Measured at canvas scale, so the result is already in canvas units.
        let painter = egui::Painter::new(
            self.ctx.clone(),
            egui::LayerId::background(),
            Rect::EVERYTHING,
        );
        let galley = painter.layout_no_wrap(
            text.to_string(),
            font_id(font, size as f32),
            Color32::BLACK,
        );
        galley.rect.width() as f64
    }

    fn image(&mut self, x: f64, y: f64, w: u32, h: u32, name: &str) {
        self.pending.push(DrawCommand::Image {
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

/// The eframe app. Paints whatever frame the controller last published.
pub struct Viewer {
    frame: Frame,
    controller: Option<Controller>,
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl Viewer {
    pub fn new(controller: Controller) -> Self {
        Self {
            frame: Arc::new(Mutex::new(Vec::new())),
            controller: Some(controller),
            textures: HashMap::new(),
        }
    }

    fn start_controller(&mut self, ctx: &egui::Context) {
        let Some(controller) = self.controller.take() else {
            return;
        };
        let native = ctx.input(|i| i.viewport().monitor_size).and_then(|size| {
            let ppp = ctx.pixels_per_point();
            let (w, h) = ((size.x * ppp).round(), (size.y * ppp).round());
            (w >= 1.0 && h >= 1.0).then_some((w as u32, h as u32))
        });
        debug!(?native, "starting controller");

        let surface = EguiSurface::new(ctx.clone(), Arc::clone(&self.frame), native);
        std::thread::spawn(move || controller(surface));
    }

    fn texture(&mut self, ctx: &egui::Context, name: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.get(name) {
            return cached.clone();
        }
        let loaded = load_texture(ctx, Path::new(name));
        self.textures.insert(name.to_string(), loaded.clone());
        loaded
    }

    fn paint(&mut self, ui: &egui::Ui, commands: &[DrawCommand]) {
        let painter = ui.painter();
        let screen = ui.max_rect();
        let mut view = Letterbox::fit(1, 1, screen);
        let mut fill = Color32::BLACK;
        let mut stroke = Stroke::new(1.0, Color32::BLACK);

        for command in commands {
            match command {
                DrawCommand::Begin { width, height } => {
                    view = Letterbox::fit(*width, *height, screen);
                }
                DrawCommand::Background(paint) => {
                    painter.rect_filled(view.canvas(), 0.0, to_color32(color::resolve(paint)));
                }
                DrawCommand::Fill(paint) => fill = to_color32(color::resolve(paint)),
                DrawCommand::Stroke(paint, width) => {
                    stroke = Stroke::new(
                        view.length(*width).max(1.0),
                        to_color32(color::resolve(paint)),
                    );
                }
                DrawCommand::Rect { x, y, w, h } => {
                    painter.rect_filled(view.rect(*x, *y, *w, *h), 0.0, fill);
                }
                DrawCommand::Circle { x, y, r } => {
                    painter.circle_filled(view.point(*x, *y), view.length(*r), fill);
                }
                DrawCommand::Line { x1, y1, x2, y2 } => {
                    painter.line_segment([view.point(*x1, *y1), view.point(*x2, *y2)], stroke);
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font,
                    size,
                    align,
                } => {
                    let anchor = match align {
                        Align::Start => egui::Align2::LEFT_BOTTOM,
                        Align::Center => egui::Align2::CENTER_BOTTOM,
                        Align::End => egui::Align2::RIGHT_BOTTOM,
                    };
                    painter.text(
                        view.point(*x, *y),
                        anchor,
                        text,
                        font_id(*font, view.length(*size)),
                        fill,
                    );
                }
                DrawCommand::Image { x, y, w, h, name } => {
                    let rect = view.rect(*x, *y, f64::from(*w), f64::from(*h));
                    match self.texture(ui.ctx(), name) {
                        Some(texture) => {
                            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                            painter.image(texture.id(), rect, uv, Color32::WHITE);
                        }
                        None => placeholder(painter, rect, name),
                    }
                }
            }
        }
    }
}

fn load_texture(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot load image");
            return None;
        }
    };
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let color_image = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], rgba.as_raw());
    Some(ctx.load_texture(
        path.to_string_lossy(),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}

fn placeholder(painter: &egui::Painter, rect: Rect, name: &str) {
    let gray = Color32::from_gray(160);
    painter.rect_filled(rect, 0.0, Color32::from_gray(235));
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, gray), egui::StrokeKind::Inside);
    painter.line_segment([rect.left_top(), rect.right_bottom()], Stroke::new(1.0, gray));
    painter.line_segment([rect.right_top(), rect.left_bottom()], Stroke::new(1.0, gray));
    let label = Path::new(name)
        .file_name()
        .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        FontId::proportional(14.0),
        Color32::from_gray(90),
    );
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.start_controller(ctx);

        let commands = self
            .frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::BLACK).inner_margin(0.0))
            .show(ctx, |ui| self.paint(ui, &commands));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(w, h))
    }

    #[test]
    fn test_letterbox_flips_y() {
        let view = Letterbox::fit(100, 50, screen(200.0, 100.0));
        assert_eq!(view.scale, 2.0);
        assert_eq!(view.point(0.0, 0.0), Pos2::new(0.0, 100.0));
        assert_eq!(view.point(100.0, 50.0), Pos2::new(200.0, 0.0));
    }

    #[test]
    fn test_letterbox_centers_narrow_canvas() {
        let view = Letterbox::fit(100, 100, screen(400.0, 200.0));
        assert_eq!(view.scale, 2.0);
        assert_eq!(view.origin, Pos2::new(100.0, 0.0));
        let r = view.rect(0.0, 0.0, 50.0, 25.0);
        assert_eq!(r.min, Pos2::new(100.0, 150.0));
        assert_eq!(r.max, Pos2::new(200.0, 200.0));
        assert_eq!(view.canvas(), Rect::from_min_max(Pos2::new(100.0, 0.0), Pos2::new(300.0, 200.0)));
    }

    #[test]
    fn test_color_conversion() {
        let c = to_color32(color::resolve(&Paint::named("red")));
        assert_eq!(c, Color32::from_rgb(255, 0, 0));
        let half = to_color32(Rgba {
            a: 0.5,
            ..Rgba::BLACK
        });
        assert_eq!(half.a(), 128);
    }

    #[test]
    fn test_surface_publishes_on_end_frame() {
        let frame: Frame = Arc::default();
        let mut surface = EguiSurface::new(egui::Context::default(), Arc::clone(&frame), None);
        surface.begin_frame(10, 10);
        surface.rect(1.0, 1.0, 2.0, 2.0);
        assert!(frame.lock().unwrap().is_empty());

        surface.end_frame();
        assert_eq!(frame.lock().unwrap().len(), 2);

        surface.line(0.0, 0.0, 1.0, 1.0);
        surface.end_frame();
        assert_eq!(frame.lock().unwrap().len(), 3);
        assert_eq!(surface.native_size(), None);
    }

    #[test]
    fn test_font_families() {
        assert_eq!(font_id(Font::Mono, 12.0).family, FontFamily::Monospace);
        assert_eq!(font_id(Font::Serif, 12.0).family, FontFamily::Proportional);
    }
}
