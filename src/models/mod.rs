pub mod card;
pub mod deck;
pub mod editor;
pub mod session;
pub mod state;

pub use card::Card;
pub use deck::Deck;
pub use session::{Decision, SWIPE_THRESHOLD, classify_drag};
pub use state::{AppState, Stats};
