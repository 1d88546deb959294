pub mod keymap;
pub mod navigator;
pub mod terminal;

use std::io;

use colored::Colorize;
use tracing::{debug, warn};

use crate::render::Surface;

pub use keymap::{Action, Key, action_for};
pub use navigator::{Navigator, Outcome};

/// Where keystrokes come from and status messages go.
pub trait Console {
    /// Block until the next keystroke.
    fn read_key(&mut self) -> io::Result<Key>;
    /// Read one line of text with line editing, without the line terminator.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
    fn status(&mut self, message: &str);
}

/// Show the current slide, then dispatch keystrokes until the quit key.
///
/// Returns an error only when reading input fails; everything else,
/// including a failed reload, keeps the loop going.
pub fn run<C, S>(nav: &mut Navigator, console: &mut C, surface: &mut S) -> io::Result<()>
where
    C: Console + ?Sized,
    S: Surface + ?Sized,
{
    nav.show(surface);
    loop {
        let action = match action_for(console.read_key()?) {
            Action::Search(_) => Action::Search(console.read_line("/")?),
            action => action,
        };
        debug!(?action, slide = nav.current(), "dispatch");

        match nav.apply(action, surface) {
            Outcome::Quit => return Ok(()),
            Outcome::ReloadFailed(err) => {
                warn!(path = %nav.source().display(), %err, "reload failed");
                console.status(&format!(
                    "{} {err} (still showing the previous version)",
                    "reload failed:".red().bold()
                ));
            }
            Outcome::NotFound(query) => {
                console.status(&format!("{} {query:?}", "not found:".yellow()));
            }
            Outcome::Shown(_) | Outcome::Reloaded | Outcome::Unchanged => {}
        }
    }
}
