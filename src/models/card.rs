//! Card is a front/back question-answer unit belonging to exactly one deck.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: String,
    /// Foreign key to the owning deck. Cards whose deck no longer exists are
    /// orphaned: they stay in the collection but never show up in a deck's
    /// card list.
    #[serde(default)]
    pub deck_id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Set only when the card is edited, never at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form extension bag (provenance flags etc.), preserved verbatim
    /// through import/export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

fn default_kind() -> String {
    "fact".to_string()
}

impl Card {
    pub fn new(deck_id: &str, front: &str, back: &str, tags: Vec<String>) -> Self {
        Self {
            id: Self::fresh_id(),
            deck_id: deck_id.to_string(),
            kind: default_kind(),
            front: front.to_string(),
            back: back.to_string(),
            tags,
            difficulty: None,
            estimated_seconds: None,
            locale: None,
            created_at: Utc::now(),
            updated_at: None,
            meta: Some(json!({ "version": 1, "aiGenerated": false })),
        }
    }

    /// Allocates a new globally unique card id.
    pub fn fresh_id() -> String {
        format!("card-{}", Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_defaults() {
        let card = Card::new("deck-1", "front", "back", vec!["a".to_string()]);
        assert!(card.id.starts_with("card-"));
        assert_eq!(card.kind, "fact");
        assert_eq!(card.deck_id, "deck-1");
        assert!(card.updated_at.is_none());
        assert_eq!(card.meta.as_ref().unwrap()["aiGenerated"], false);
    }

    #[test]
    fn test_card_wire_field_names() {
        let card = Card::new("deck-1", "f", "b", vec![]);
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("deckId").is_some());
        assert_eq!(json["type"], "fact");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_card_deserializes_foreign_meta_verbatim() {
        let raw = r#"{
            "id": "card-x",
            "deckId": "deck-x",
            "front": "f",
            "back": "b",
            "meta": { "version": 3, "aiGenerated": true, "source": "elsewhere" }
        }"#;
        let card: Card = serde_json::from_str(raw).unwrap();
        assert_eq!(card.kind, "fact");
        let meta = card.meta.unwrap();
        assert_eq!(meta["version"], 3);
        assert_eq!(meta["source"], "elsewhere");
    }
}
