//! Deck is a named collection of cards sharing a topic/language.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    /// Stable unique identifier, e.g. `deck-sample-1`. May be empty on an
    /// imported document, in which case a fresh one is allocated.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Deck {
    pub fn new(title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Self::fresh_id(),
            title: title.to_string(),
            description: String::new(),
            language: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            author_id: None,
        }
    }

    /// Allocates a new globally unique deck id.
    pub fn fresh_id() -> String {
        format!("deck-{}", Uuid::new_v4())
    }
}
