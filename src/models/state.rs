//! The whole application state: all decks and cards, the review cursor and
//! the lifetime statistics. One instance lives for the whole session and is
//! persisted as a single blob after every mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Card, Deck};
use crate::error::{Error, Result};

/// Lifetime review counters, global across all decks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub known: u64,
    #[serde(default)]
    pub skipped: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Insertion order is display order. A persisted blob without this field
    /// is treated as corrupt and replaced by the seed dataset.
    pub decks: Vec<Deck>,
    /// All cards across all decks, in global insertion order.
    pub cards: Vec<Card>,
    #[serde(default)]
    pub current_deck_id: Option<String>,
    /// Zero-based cursor into the current deck's card list.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub stats: Stats,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            decks: Vec::new(),
            cards: Vec::new(),
            current_deck_id: None,
            index: 0,
            stats: Stats::default(),
        }
    }
}

impl AppState {
    /// Built-in sample data installed on first run or after state corruption.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let deck = Deck {
            id: "deck-sample-1".to_string(),
            title: "Polish Starter".to_string(),
            description: "Everyday Polish words and phrases".to_string(),
            language: "pl-PL".to_string(),
            tags: vec!["polish".to_string(), "vocabulary".to_string()],
            created_at: now,
            updated_at: now,
            author_id: Some("local".to_string()),
        };
        let card = |id: &str, front: &str, back: &str, tags: &[&str]| Card {
            id: id.to_string(),
            deck_id: deck.id.clone(),
            kind: "fact".to_string(),
            front: front.to_string(),
            back: back.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            difficulty: Some("easy".to_string()),
            estimated_seconds: Some(15),
            locale: Some("pl-PL".to_string()),
            created_at: now,
            updated_at: None,
            meta: Some(json!({ "version": 1, "aiGenerated": false })),
        };
        let cards = vec![
            card("card-1", "cześć", "hello", &["greetings"]),
            card("card-2", "dziękuję", "thank you", &["politeness"]),
        ];
        Self {
            current_deck_id: Some(deck.id.clone()),
            decks: vec![deck],
            cards,
            index: 0,
            stats: Stats::default(),
        }
    }

    /// Cards belonging to the given deck, preserving the global insertion
    /// order. Orphaned cards (dangling `deck_id`) never appear anywhere.
    pub fn cards_of_deck(&self, deck_id: &str) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.deck_id == deck_id).collect()
    }

    /// The active deck. Falls back to the first deck when `current_deck_id`
    /// does not match anything; `None` only when there are no decks at all.
    pub fn current_deck(&self) -> Option<&Deck> {
        self.current_deck_id
            .as_deref()
            .and_then(|id| self.decks.iter().find(|d| d.id == id))
            .or_else(|| self.decks.first())
    }

    /// Cards of the active deck (after the fallback in [`Self::current_deck`]).
    pub fn current_cards(&self) -> Vec<&Card> {
        match self.current_deck() {
            Some(deck) => {
                let id = deck.id.clone();
                self.cards_of_deck(&id)
            }
            None => Vec::new(),
        }
    }

    /// Switches the review session to another deck and rewinds the cursor.
    pub fn select_deck(&mut self, deck_id: &str) {
        self.current_deck_id = Some(deck_id.to_string());
        self.index = 0;
    }

    pub fn create_deck(&mut self, title: &str) -> Result<Deck> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("deck title must not be empty".into()));
        }
        let deck = Deck::new(title);
        self.current_deck_id = Some(deck.id.clone());
        self.index = 0;
        self.decks.push(deck.clone());
        Ok(deck)
    }

    pub fn create_card(
        &mut self,
        deck_id: &str,
        front: &str,
        back: &str,
        tags: Vec<String>,
    ) -> Result<Card> {
        let (front, back) = validate_sides(front, back)?;
        let card = Card::new(deck_id, front, back, tags);
        self.cards.push(card.clone());
        Ok(card)
    }

    /// Edits an existing card in place. The collection is left untouched when
    /// the id does not resolve; the caller decides whether that is worth
    /// surfacing.
    pub fn update_card(
        &mut self,
        card_id: &str,
        front: &str,
        back: &str,
        tags: Vec<String>,
    ) -> Result<Card> {
        let (front, back) = validate_sides(front, back)?;
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| Error::NotFound(format!("card {card_id}")))?;
        card.front = front.to_string();
        card.back = back.to_string();
        card.tags = tags;
        card.updated_at = Some(Utc::now());
        Ok(card.clone())
    }
}

/// Both sides of a card are required; whitespace-only counts as empty.
fn validate_sides<'a>(front: &'a str, back: &'a str) -> Result<(&'a str, &'a str)> {
    let front = front.trim();
    let back = back.trim();
    if front.is_empty() || back.is_empty() {
        return Err(Error::Validation("front and back are required".into()));
    }
    Ok((front, back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_state_shape() {
        let state = AppState::seeded();
        assert_eq!(state.decks.len(), 1);
        assert_eq!(state.cards.len(), 2);
        assert_eq!(state.decks[0].id, "deck-sample-1");
        assert_eq!(state.current_deck_id.as_deref(), Some("deck-sample-1"));
        assert_eq!(state.index, 0);
        assert_eq!(state.stats.known, 0);
    }

    #[test]
    fn test_cards_of_deck_filters_and_keeps_order() {
        let mut state = AppState::seeded();
        let other = state.create_deck("Other").unwrap();
        state.create_card(&other.id, "q1", "a1", vec![]).unwrap();
        state
            .create_card("deck-sample-1", "q2", "a2", vec![])
            .unwrap();
        state.create_card(&other.id, "q3", "a3", vec![]).unwrap();

        let sample: Vec<&str> = state
            .cards_of_deck("deck-sample-1")
            .iter()
            .map(|c| c.front.as_str())
            .collect();
        assert_eq!(sample, vec!["cześć", "dziękuję", "q2"]);

        let others: Vec<&str> = state
            .cards_of_deck(&other.id)
            .iter()
            .map(|c| c.front.as_str())
            .collect();
        assert_eq!(others, vec!["q1", "q3"]);
    }

    #[test]
    fn test_orphaned_cards_are_invisible() {
        let mut state = AppState::seeded();
        state
            .create_card("deck-gone", "lost front", "lost back", vec![])
            .unwrap();
        assert_eq!(state.cards.len(), 3);
        assert_eq!(state.current_cards().len(), 2);
    }

    #[test]
    fn test_current_deck_falls_back_to_first() {
        let mut state = AppState::seeded();
        state.current_deck_id = Some("deck-missing".to_string());
        assert_eq!(state.current_deck().unwrap().id, "deck-sample-1");

        state.decks.clear();
        assert!(state.current_deck().is_none());
        assert!(state.current_cards().is_empty());
    }

    #[test]
    fn test_create_deck_selects_and_rewinds() {
        let mut state = AppState::seeded();
        state.index = 1;
        let deck = state.create_deck("  New Deck  ").unwrap();
        assert_eq!(deck.title, "New Deck");
        assert_eq!(state.current_deck_id.as_deref(), Some(deck.id.as_str()));
        assert_eq!(state.index, 0);
        assert_eq!(state.decks.len(), 2);
    }

    #[test]
    fn test_create_deck_rejects_blank_title() {
        let mut state = AppState::seeded();
        let err = state.create_deck("   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(state.decks.len(), 1);
    }

    #[test]
    fn test_generated_ids_are_pairwise_distinct() {
        let mut state = AppState::default();
        let mut ids = Vec::new();
        for i in 0..20 {
            let deck = state.create_deck(&format!("deck {i}")).unwrap();
            let card = state.create_card(&deck.id, "f", "b", vec![]).unwrap();
            ids.push(deck.id);
            ids.push(card.id);
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_create_card_rejects_blank_sides() {
        let mut state = AppState::seeded();
        let err = state
            .create_card("deck-sample-1", "", "back", vec![])
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = state
            .create_card("deck-sample-1", "front", "   ", vec![])
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(state.cards.len(), 2);
    }

    #[test]
    fn test_create_card_trims_content() {
        let mut state = AppState::seeded();
        let card = state
            .create_card("deck-sample-1", "  q  ", " a ", vec![])
            .unwrap();
        assert_eq!(card.front, "q");
        assert_eq!(card.back, "a");
    }

    #[test]
    fn test_update_card_refreshes_updated_at() {
        let mut state = AppState::seeded();
        let edited = state
            .update_card("card-1", "new front", "new back", vec!["t".to_string()])
            .unwrap();
        assert_eq!(edited.front, "new front");
        assert!(edited.updated_at.is_some());
        assert_eq!(state.cards[0].back, "new back");
    }

    #[test]
    fn test_update_missing_card_leaves_collection_unchanged() {
        let mut state = AppState::seeded();
        let before = serde_json::to_string(&state.cards).unwrap();
        let err = state
            .update_card("nonexistent-id", "a", "b", vec![])
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(serde_json::to_string(&state.cards).unwrap(), before);
    }

    #[test]
    fn test_deck_updated_at_untouched_by_card_edits() {
        let mut state = AppState::seeded();
        let before = state.decks[0].updated_at;
        state
            .update_card("card-1", "changed", "changed", vec![])
            .unwrap();
        assert_eq!(state.decks[0].updated_at, before);
    }
}
