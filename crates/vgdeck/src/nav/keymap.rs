/// A keystroke as delivered by the terminal, reduced to what the presenter
/// distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Other,
}

/// What the presenter should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    First,
    Last,
    Next,
    Prev,
    Reload,
    /// Jump to the first slide containing the query. The search key maps to
    /// an empty query; the controller then reads the query from the user.
    Search(String),
    Grid,
    Quit,
    NoOp,
}

pub fn action_for(key: Key) -> Action {
    match key {
        Key::Char('0' | '1' | '^') | Key::Home => Action::First,
        Key::Char('*' | '$') | Key::End => Action::Last,
        Key::Char('+' | 'n' | ' ')
        | Key::Enter
        | Key::Tab
        | Key::Right
        | Key::Down
        | Key::PageDown => Action::Next,
        Key::Char('-' | 'p') | Key::Backspace | Key::Left | Key::Up | Key::PageUp => Action::Prev,
        Key::Char('r') => Action::Reload,
        Key::Char('g') => Action::Grid,
        Key::Char('/') => Action::Search(String::new()),
        Key::Char('q') | Key::Esc | Key::Ctrl('c') => Action::Quit,
        _ => Action::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys() {
        for key in [Key::Char('0'), Key::Char('1'), Key::Home] {
            assert_eq!(action_for(key), Action::First);
        }
        for key in [Key::Char('*'), Key::End] {
            assert_eq!(action_for(key), Action::Last);
        }
        for key in [Key::Char('n'), Key::Char('+'), Key::Enter, Key::Tab, Key::Right] {
            assert_eq!(action_for(key), Action::Next);
        }
        for key in [Key::Char('p'), Key::Char('-'), Key::Left, Key::Backspace] {
            assert_eq!(action_for(key), Action::Prev);
        }
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(action_for(Key::Char('r')), Action::Reload);
        assert_eq!(action_for(Key::Char('g')), Action::Grid);
        assert_eq!(action_for(Key::Char('/')), Action::Search(String::new()));
        assert_eq!(action_for(Key::Char('q')), Action::Quit);
        assert_eq!(action_for(Key::Ctrl('c')), Action::Quit);
        assert_eq!(action_for(Key::Esc), Action::Quit);
    }

    #[test]
    fn test_unbound_keys_do_nothing() {
        for key in [Key::Char('x'), Key::Char('Q'), Key::Ctrl('n'), Key::Other] {
            assert_eq!(action_for(key), Action::NoOp);
        }
    }
}
