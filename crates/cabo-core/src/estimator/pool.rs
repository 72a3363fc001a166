use crate::game::state::GameState;
use crate::model::card::{Card, DECK_SIZE};
use crate::model::player::PlayerId;

/// Cards a perspective player cannot attribute to the discard pile or to any slot they know.
///
/// Membership is decided by canonical id, so the pool is the canonical deck minus every id the
/// perspective player can see or remembers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPool {
    cards: Vec<Card>,
}

impl UnknownPool {
    pub fn build(state: &GameState, perspective: PlayerId) -> Self {
        let mut known = [false; DECK_SIZE];
        for card in state.discard_pile() {
            known[card.id().index()] = true;
        }
        for seat in PlayerId::LOOP {
            for slot in 0..state.hand(seat).len() {
                if let Some(card) = state.believed(perspective, seat, slot) {
                    known[card.id().index()] = true;
                }
            }
        }

        let cards = (0..DECK_SIZE as u8)
            .filter_map(Card::canonical)
            .filter(|card| !known[card.id().index()])
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}
