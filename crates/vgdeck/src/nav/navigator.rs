use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::deck::{self, Canvas, Deck, LoadError};
use crate::layout::Spacing;
use crate::render::{Surface, grid, render_slide};

use super::keymap::Action;

/// The result of applying one [`Action`].
#[derive(Debug)]
pub enum Outcome {
    /// The slide at this index was rendered.
    Shown(usize),
    /// The deck was read again and the current index rendered against it.
    Reloaded,
    /// The replacement deck could not be loaded; the previous one is kept.
    ReloadFailed(LoadError),
    /// No slide contains the query.
    NotFound(String),
    /// Nothing to redraw.
    Unchanged,
    Quit,
}

/// Owns the loaded deck and the index of the slide on display.
#[derive(Debug)]
pub struct Navigator {
    deck: Deck,
    source: PathBuf,
    fallback: Canvas,
    spacing: Spacing,
    current: usize,
}

impl Navigator {
    pub fn open(source: &Path, fallback: Canvas, spacing: Spacing) -> Result<Self, LoadError> {
        let deck = deck::load(source, fallback)?;
        Ok(Self::new(deck, source.to_path_buf(), fallback, spacing))
    }

    pub fn new(deck: Deck, source: PathBuf, fallback: Canvas, spacing: Spacing) -> Self {
        Self {
            deck,
            source,
            fallback,
            spacing,
            current: 0,
        }
    }

    /// Start on `index` instead of the first slide, if the deck has it.
    pub fn start_at(mut self, index: usize) -> Self {
        if index < self.deck.slide_count() {
            self.current = index;
        }
        self
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn show<S: Surface + ?Sized>(&self, surface: &mut S) {
        render_slide(surface, &self.deck, self.current, self.spacing);
    }

    fn last(&self) -> usize {
        self.deck.slide_count().saturating_sub(1)
    }

    fn go<S: Surface + ?Sized>(&mut self, index: usize, surface: &mut S) -> Outcome {
        self.current = index;
        debug!(slide = index, "showing slide");
        self.show(surface);
        Outcome::Shown(index)
    }

    pub fn apply<S: Surface + ?Sized>(&mut self, action: Action, surface: &mut S) -> Outcome {
        match action {
            Action::First => self.go(0, surface),
            Action::Last => self.go(self.last(), surface),
            Action::Next => {
                let next = if self.current >= self.last() {
                    0
                } else {
                    self.current + 1
                };
                self.go(next, surface)
            }
            Action::Prev => {
                let prev = if self.current == 0 {
                    self.last()
                } else {
                    self.current - 1
                };
                self.go(prev, surface)
            }
            Action::Reload => match deck::load(&self.source, self.fallback) {
                Ok(deck) => {
                    info!(
                        path = %self.source.display(),
                        slides = deck.slide_count(),
                        "reloaded deck"
                    );
                    self.deck = deck;
                    self.show(surface);
                    Outcome::Reloaded
                }
                Err(err) => Outcome::ReloadFailed(err),
            },
            Action::Search(query) => {
                if query.is_empty() {
                    return Outcome::Unchanged;
                }
                match deck::search::find(&self.deck, &query) {
                    Some(index) => self.go(index, surface),
                    None => Outcome::NotFound(query),
                }
            }
            Action::Grid => {
                grid::render_with_grid(surface, &self.deck, self.current, self.spacing);
                Outcome::Unchanged
            }
            Action::Quit => Outcome::Quit,
            Action::NoOp => Outcome::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;
    use crate::render::record::DisplayList;

    const DISPLAY: Canvas = Canvas {
        width: 800,
        height: 600,
    };

    fn deck_source(texts: &[&str]) -> String {
        let mut src = String::from("<deck>");
        for t in texts {
            src.push_str(&format!("<slide><text>{t}</text></slide>"));
        }
        src.push_str("</deck>");
        src
    }

    fn navigator(texts: &[&str]) -> Navigator {
        let deck = deck::parse(&deck_source(texts), DISPLAY).unwrap();
        Navigator::new(deck, PathBuf::from("unused.xml"), DISPLAY, Spacing::default())
    }

    fn walk(nav: &mut Navigator, action: Action) -> usize {
        let mut list = DisplayList::default();
        nav.apply(action, &mut list);
        nav.current()
    }

    #[test]
    fn test_next_wraps_to_first() {
        let mut nav = navigator(&["a", "b", "c"]);
        assert_eq!(walk(&mut nav, Action::Next), 1);
        assert_eq!(walk(&mut nav, Action::Next), 2);
        assert_eq!(walk(&mut nav, Action::Next), 0);
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut nav = navigator(&["a", "b", "c"]);
        assert_eq!(walk(&mut nav, Action::Prev), 2);
        assert_eq!(walk(&mut nav, Action::Prev), 1);
    }

    #[test]
    fn test_single_slide_stays_put() {
        let mut nav = navigator(&["only"]);
        assert_eq!(walk(&mut nav, Action::Next), 0);
        assert_eq!(walk(&mut nav, Action::Prev), 0);
    }

    #[test]
    fn test_first_and_last() {
        let mut nav = navigator(&["a", "b", "c", "d"]);
        assert_eq!(walk(&mut nav, Action::Last), 3);
        assert_eq!(walk(&mut nav, Action::First), 0);
    }

    #[test]
    fn test_empty_deck_navigation_draws_nothing() {
        let mut nav = navigator(&[]);
        let mut list = DisplayList::default();
        for action in [Action::Next, Action::Prev, Action::Last, Action::First] {
            nav.apply(action, &mut list);
            assert_eq!(nav.current(), 0);
        }
        assert!(list.published().is_empty());
    }

    #[test]
    fn test_start_at_ignores_out_of_range() {
        assert_eq!(navigator(&["a", "b"]).start_at(1).current(), 1);
        assert_eq!(navigator(&["a", "b"]).start_at(5).current(), 0);
    }

    #[test]
    fn test_search_scans_from_start() {
        let mut nav = navigator(&["apple", "banana apple", "cherry"]).start_at(2);
        let mut list = DisplayList::default();
        let outcome = nav.apply(Action::Search("apple".into()), &mut list);
        assert!(matches!(outcome, Outcome::Shown(0)));
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn test_search_miss_leaves_slide() {
        let mut nav = navigator(&["apple", "banana"]).start_at(1);
        let mut list = DisplayList::default();
        let outcome = nav.apply(Action::Search("durian".into()), &mut list);
        assert!(matches!(outcome, Outcome::NotFound(q) if q == "durian"));
        assert_eq!(nav.current(), 1);
        assert!(list.published().is_empty());

        let outcome = nav.apply(Action::Search(String::new()), &mut list);
        assert!(matches!(outcome, Outcome::Unchanged));
        assert_eq!(nav.current(), 1);
        assert!(list.published().is_empty());
    }

    #[test]
    fn test_grid_keeps_index() {
        let mut nav = navigator(&["a", "b"]).start_at(1);
        let mut list = DisplayList::default();
        nav.show(&mut list);
        nav.apply(Action::Grid, &mut list);
        assert_eq!(nav.current(), 1);
        assert_eq!(list.published().len(), 2);
        assert!(
            list.published()[1]
                .iter()
                .any(|c| matches!(c, DrawCommand::Line { .. }))
        );
    }

    #[test]
    fn test_grid_twice_redraws_once() {
        let mut nav = navigator(&["a", "b"]);
        let mut list = DisplayList::default();
        nav.show(&mut list);
        nav.apply(Action::Grid, &mut list);
        nav.apply(Action::Grid, &mut list);

        assert_eq!(list.published().len(), 3);
        let lines = list
            .last_published()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 20);
    }

    #[test]
    fn test_grid_on_empty_deck_draws_nothing() {
        let mut nav = navigator(&[]);
        let mut list = DisplayList::default();
        assert!(matches!(nav.apply(Action::Grid, &mut list), Outcome::Unchanged));
        assert!(list.published().is_empty());
        assert!(list.commands().is_empty());
    }

    #[test]
    fn test_noop_and_quit() {
        let mut nav = navigator(&["a", "b"]);
        let mut list = DisplayList::default();
        assert!(matches!(nav.apply(Action::NoOp, &mut list), Outcome::Unchanged));
        assert!(matches!(nav.apply(Action::Quit, &mut list), Outcome::Quit));
        assert!(list.published().is_empty());
    }

    #[test]
    fn test_reload_replaces_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.xml");
        std::fs::write(&path, deck_source(&["one", "two"])).unwrap();
        let mut nav = Navigator::open(&path, DISPLAY, Spacing::default())
            .unwrap()
            .start_at(1);

        std::fs::write(&path, deck_source(&["uno", "dos", "tres"])).unwrap();
        let mut list = DisplayList::default();
        assert!(matches!(nav.apply(Action::Reload, &mut list), Outcome::Reloaded));
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.deck().slide_count(), 3);
        assert_eq!(nav.deck().slides[1].texts[0].content, "dos");
        assert_eq!(list.published().len(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.xml");
        std::fs::write(&path, deck_source(&["one", "two"])).unwrap();
        let mut nav = Navigator::open(&path, DISPLAY, Spacing::default())
            .unwrap()
            .start_at(1);
        let before = nav.deck().clone();

        std::fs::write(&path, "<deck><slide><text>broken</slide>").unwrap();
        let mut list = DisplayList::default();
        assert!(matches!(
            nav.apply(Action::Reload, &mut list),
            Outcome::ReloadFailed(_)
        ));
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.deck(), &before);
        assert!(list.published().is_empty());

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            nav.apply(Action::Reload, &mut list),
            Outcome::ReloadFailed(LoadError::Open { .. })
        ));
        assert_eq!(nav.deck(), &before);
    }

    #[test]
    fn test_reload_into_shorter_deck_keeps_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.xml");
        std::fs::write(&path, deck_source(&["a", "b", "c"])).unwrap();
        let mut nav = Navigator::open(&path, DISPLAY, Spacing::default())
            .unwrap()
            .start_at(2);

        std::fs::write(&path, deck_source(&["a"])).unwrap();
        let mut list = DisplayList::default();
        assert!(matches!(nav.apply(Action::Reload, &mut list), Outcome::Reloaded));
        assert_eq!(nav.current(), 2);
        assert!(list.published().is_empty());

        assert_eq!(walk(&mut nav, Action::Next), 0);
    }
}
