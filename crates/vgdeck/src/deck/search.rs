use super::{Deck, Slide};

/// Index of the first slide, counting from the start of the deck, whose list
/// items or text contain `query` verbatim. An empty query matches nothing.
pub fn find(deck: &Deck, query: &str) -> Option<usize> {
    if query.is_empty() {
        return None;
    }
    deck.slides.iter().position(|slide| contains(slide, query))
}

fn contains(slide: &Slide, query: &str) -> bool {
    slide
        .lists
        .iter()
        .flat_map(|list| list.items.iter())
        .any(|item| item.contains(query))
        || slide.texts.iter().any(|text| text.content.contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Canvas, List, ListKind, Placement, Text, TextKind};

    fn text_slide(content: &str) -> Slide {
        Slide {
            texts: vec![Text {
                at: Placement::default(),
                kind: TextKind::Plain,
                wp: 0.0,
                content: content.to_string(),
            }],
            ..Slide::default()
        }
    }

    fn list_slide(items: &[&str]) -> Slide {
        Slide {
            lists: vec![List {
                at: Placement::default(),
                kind: ListKind::Bullet,
                items: items.iter().map(|s| s.to_string()).collect(),
            }],
            ..Slide::default()
        }
    }

    fn deck(slides: Vec<Slide>) -> Deck {
        Deck {
            canvas: Canvas {
                width: 800,
                height: 600,
            },
            slides,
            base_dir: Default::default(),
        }
    }

    #[test]
    fn test_first_match_from_start() {
        let d = deck(vec![
            text_slide("apple"),
            text_slide("banana apple"),
            text_slide("cherry"),
        ]);
        assert_eq!(find(&d, "apple"), Some(0));
        assert_eq!(find(&d, "banana"), Some(1));
        assert_eq!(find(&d, "cherry"), Some(2));
    }

    #[test]
    fn test_list_items_are_searched() {
        let d = deck(vec![text_slide("intro"), list_slide(&["alpha", "beta"])]);
        assert_eq!(find(&d, "bet"), Some(1));
    }

    #[test]
    fn test_case_sensitive() {
        let d = deck(vec![text_slide("Apple")]);
        assert_eq!(find(&d, "apple"), None);
        assert_eq!(find(&d, "Apple"), Some(0));
    }

    #[test]
    fn test_empty_query_and_miss() {
        let d = deck(vec![text_slide("apple")]);
        assert_eq!(find(&d, ""), None);
        assert_eq!(find(&d, "durian"), None);
    }

    #[test]
    fn test_empty_deck() {
        assert_eq!(find(&deck(Vec::new()), "x"), None);
    }
}
