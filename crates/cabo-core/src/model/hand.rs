use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::vec::Vec;

/// Cards dealt to each player at round start; hands never grow past this.
pub const HAND_SIZE: usize = 4;

/// A card sitting in a hand slot. `face_up` marks a card taken from the discard pile:
/// it is public for the rest of the round and the flag moves with the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldCard {
    pub card: Card,
    pub face_up: bool,
}

impl HeldCard {
    pub const fn face_down(card: Card) -> Self {
        Self {
            card,
            face_up: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hand {
    slots: Vec<HeldCard>,
}

impl Hand {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            slots: cards.into_iter().map(HeldCard::face_down).collect(),
        }
    }

    pub fn push(&mut self, card: Card) {
        self.slots.push(HeldCard::face_down(card));
    }

    pub fn card(&self, slot: usize) -> Option<Card> {
        self.slots.get(slot).map(|held| held.card)
    }

    pub fn slot(&self, slot: usize) -> Option<&HeldCard> {
        self.slots.get(slot)
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut HeldCard> {
        self.slots.get_mut(slot)
    }

    pub fn is_face_up(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|held| held.face_up)
    }

    /// Puts `card` into `slot` and returns the previous occupant.
    pub fn replace(&mut self, slot: usize, card: Card, face_up: bool) -> Option<Card> {
        let held = self.slots.get_mut(slot)?;
        let previous = held.card;
        *held = HeldCard { card, face_up };
        Some(previous)
    }

    /// Removes the given slots, keeping the remaining cards in order.
    /// Returned cards are in ascending slot order; out-of-range indices are ignored.
    pub fn remove_slots(&mut self, slots: &[usize]) -> Vec<Card> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.slots.len());
        for (index, held) in self.slots.drain(..).enumerate() {
            if slots.contains(&index) {
                removed.push(held.card);
            } else {
                kept.push(held);
            }
        }
        self.slots = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().map(|held| held.card)
    }

    pub fn slots(&self) -> &[HeldCard] {
        &self.slots
    }

    pub fn points(&self) -> u32 {
        self.iter().map(Card::points).sum()
    }
}
