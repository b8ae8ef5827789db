//! Review session cursor and swipe classifier.
//!
//! The cursor is a linear index into the current deck's card list; it never
//! wraps and never leaves the list bounds. The classifier turns a finalized
//! horizontal drag distance (or a button press) into a known/skipped decision.

use super::AppState;

/// Minimum horizontal drag distance, in points, for a swipe to count.
pub const SWIPE_THRESHOLD: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Known,
    Skipped,
}

/// Maps a finalized drag vector to a decision. Sub-threshold drags are a
/// no-op and the card springs back.
pub fn classify_drag(dx: f32) -> Option<Decision> {
    if dx > SWIPE_THRESHOLD {
        Some(Decision::Known)
    } else if dx < -SWIPE_THRESHOLD {
        Some(Decision::Skipped)
    } else {
        None
    }
}

impl AppState {
    /// Records a decision and clamp-advances the cursor. Once the cursor sits
    /// on the last card, further advances keep incrementing the counters but
    /// leave the cursor in place.
    pub fn advance(&mut self, decision: Decision) {
        match decision {
            Decision::Known => self.stats.known += 1,
            Decision::Skipped => self.stats.skipped += 1,
        }
        let len = self.current_cards().len();
        self.index = if len == 0 {
            0
        } else {
            (self.index + 1).min(len - 1)
        };
    }

    /// Button/keyboard entry point: records only when the cursor points at a
    /// card. Returns whether anything changed, so the caller knows to persist.
    pub fn review(&mut self, decision: Decision) -> bool {
        if self.index < self.current_cards().len() {
            self.advance(decision);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_drag_threshold() {
        assert_eq!(classify_drag(150.0), Some(Decision::Known));
        assert_eq!(classify_drag(-150.0), Some(Decision::Skipped));
        assert_eq!(classify_drag(50.0), None);
        assert_eq!(classify_drag(-50.0), None);
        assert_eq!(classify_drag(100.0), None);
        assert_eq!(classify_drag(-100.0), None);
    }

    #[test]
    fn test_advance_clamps_at_last_card() {
        // Seed deck has two cards.
        let mut state = AppState::seeded();
        state.advance(Decision::Known);
        assert_eq!(state.stats.known, 1);
        assert_eq!(state.index, 1);

        state.advance(Decision::Known);
        assert_eq!(state.stats.known, 2);
        assert_eq!(state.index, 1);

        state.advance(Decision::Skipped);
        assert_eq!(state.stats.skipped, 1);
        assert_eq!(state.index, 1);
    }

    #[test]
    fn test_advance_on_empty_deck_keeps_index_zero() {
        let mut state = AppState::default();
        state.create_deck("Empty").unwrap();
        state.advance(Decision::Known);
        assert_eq!(state.index, 0);
        assert_eq!(state.stats.known, 1);
    }

    #[test]
    fn test_review_refuses_empty_deck() {
        let mut state = AppState::default();
        state.create_deck("Empty").unwrap();
        assert!(!state.review(Decision::Skipped));
        assert_eq!(state.stats.skipped, 0);
    }

    #[test]
    fn test_review_records_on_populated_deck() {
        let mut state = AppState::seeded();
        assert!(state.review(Decision::Skipped));
        assert_eq!(state.stats.skipped, 1);
        assert_eq!(state.index, 1);
        assert!(state.review(Decision::Known));
        assert_eq!(state.index, 1);
    }

    #[test]
    fn test_select_deck_rewinds_cursor() {
        let mut state = AppState::seeded();
        state.review(Decision::Known);
        assert_eq!(state.index, 1);
        state.select_deck("deck-sample-1");
        assert_eq!(state.index, 0);
        // Counters are lifetime, never reset by a deck switch.
        assert_eq!(state.stats.known, 1);
    }
}
