use std::io;
use std::path::PathBuf;

use colored::Colorize;
use eframe::egui;
use tracing::{error, info, warn};

use crate::deck::Canvas;
use crate::layout::Spacing;
use crate::nav::{self, Console, Navigator};
use crate::nav::terminal::{self, RawTerminal};
use crate::render::Surface;
use crate::viewer::{Controller, EguiSurface, Viewer};

/// How a presentation session is set up.
#[derive(Debug, Clone)]
pub struct Options {
    pub windowed: bool,
    /// Zero-based slide to open the first document on.
    pub start: Option<usize>,
    /// Canvas for decks that declare none, when the display size is unknown.
    pub fallback: Canvas,
    pub spacing: Spacing,
    /// Use the display size over `fallback` when the backend reports one.
    pub prefer_native: bool,
}

/// Present each document in turn on `surface`, reading keys from `console`.
///
/// A document that fails to load is reported and skipped. Returns once the
/// last document is quit, or early if reading input fails.
pub fn present<C, S>(
    files: &[PathBuf],
    options: &Options,
    console: &mut C,
    surface: &mut S,
) -> io::Result<()>
where
    C: Console + ?Sized,
    S: Surface + ?Sized,
{
    let fallback = match (options.prefer_native, surface.native_size()) {
        (true, Some((width, height))) => Canvas { width, height },
        _ => options.fallback,
    };

    for (n, file) in files.iter().enumerate() {
        let nav = match Navigator::open(file, fallback, options.spacing) {
            Ok(nav) => nav,
            Err(err) => {
                warn!(path = %file.display(), %err, "skipping document");
                console.status(&format!("{} {err}", "skipping:".red().bold()));
                continue;
            }
        };
        info!(
            path = %file.display(),
            slides = nav.deck().slide_count(),
            "presenting"
        );

        let mut nav = match options.start {
            Some(start) if n == 0 => nav.start_at(start),
            _ => nav,
        };
        nav::run(&mut nav, console, surface)?;
    }
    Ok(())
}

pub fn run(files: Vec<PathBuf>, options: Options) -> anyhow::Result<()> {
    let title = match files.as_slice() {
        [only] => format!(
            "vgdeck - {}",
            only.file_name().unwrap_or_default().to_string_lossy()
        ),
        _ => "vgdeck".to_string(),
    };

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    terminal::install_panic_hook();

    let controller: Controller = Box::new(move |mut surface: EguiSurface| {
        match RawTerminal::open() {
            Ok(mut console) => {
                if let Err(err) = present(&files, &options, &mut console, &mut surface) {
                    error!(%err, "reading keystrokes failed");
                }
            }
            Err(err) => error!(%err, "cannot put the terminal into raw mode"),
        }
        surface.close();
    });

    let result = eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(controller)))),
    );

    // The window may have been closed while the controller still holds raw mode.
    terminal::restore();
    result.map_err(|e| anyhow::anyhow!("{e}"))
}
