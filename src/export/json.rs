//! JSON import/export of single decks.
//!
//! A deck travels as a `{ deck, cards }` document. Export is a pure snapshot;
//! import reconciles the document against the in-memory state so every
//! imported card ends up referencing the deck it arrived with.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{AppState, Card, Deck};

/// Portable form of one deck plus its cards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckDocument {
    pub deck: Deck,
    pub cards: Vec<Card>,
}

/// Snapshots a deck and its cards. Read-only; the state is untouched.
pub fn export_deck(state: &AppState, deck_id: &str) -> Result<DeckDocument> {
    let deck = state
        .decks
        .iter()
        .find(|d| d.id == deck_id)
        .ok_or_else(|| Error::NotFound(format!("deck {deck_id}")))?;
    let cards = state
        .cards_of_deck(deck_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(DeckDocument {
        deck: deck.clone(),
        cards,
    })
}

/// Suggested file name for an exported deck, e.g. `Polish_Starter.json`.
pub fn export_file_name(deck: &Deck) -> String {
    let stem: String = deck
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{stem}.json")
}

/// Writes a deck document as pretty-printed JSON.
pub fn export_json_to_path(doc: &DeckDocument, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(doc)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Reads a deck document from a JSON file. A file that parses but does not
/// have the `{ deck, cards }` shape is an invalid-format error, not a crash.
pub fn import_json(path: &Path) -> Result<DeckDocument> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    serde_json::from_str(&contents).map_err(|e| Error::InvalidFormat(e.to_string()))
}

/// Merges a deck document into the state.
///
/// A document without a deck id gets a freshly allocated one. Ids that are
/// present are kept as-is, without checking them against existing decks.
/// Every card's `deck_id` is forced to the resolved deck id, and the imported
/// deck becomes the active one with the cursor rewound.
pub fn import_document(state: &mut AppState, doc: DeckDocument) -> Result<Deck> {
    let mut deck = doc.deck;
    if deck.id.trim().is_empty() {
        deck.id = Deck::fresh_id();
    }

    let mut cards = doc.cards;
    for card in &mut cards {
        card.deck_id = deck.id.clone();
    }

    state.current_deck_id = Some(deck.id.clone());
    state.index = 0;
    state.decks.push(deck.clone());
    state.cards.extend(cards);

    log::info!(
        "imported deck '{}' ({} cards)",
        deck.title,
        state.cards_of_deck(&deck.id).len()
    );
    Ok(deck)
}
