//! Raw keystroke input from the controlling terminal.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use super::Console;
use super::keymap::Key;

/// The terminal in raw mode for as long as this value lives.
pub struct RawTerminal {
    _raw: RawMode,
}

impl RawTerminal {
    pub fn open() -> io::Result<Self> {
        Ok(Self {
            _raw: RawMode::enter()?,
        })
    }
}

impl Console for RawTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(translate(key));
                }
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let _cooked = CookedMode::enter()?;
        let mut err = io::stderr();
        write!(err, "{prompt}")?;
        err.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn status(&mut self, message: &str) {
        let mut err = io::stderr();
        let _ = write!(err, "{message}\r\n");
        let _ = err.flush();
    }
}

fn translate(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Esc,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => Key::Other,
    }
}

struct RawMode;

impl RawMode {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Line-buffered input inside a raw-mode scope; raw mode comes back on drop.
struct CookedMode;

impl CookedMode {
    fn enter() -> io::Result<Self> {
        disable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for CookedMode {
    fn drop(&mut self) {
        let _ = enable_raw_mode();
    }
}

/// Put the terminal back into normal mode regardless of who left it raw.
pub fn restore() {
    let _ = disable_raw_mode();
}

/// Restore the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        default_hook(info);
    }));
}
