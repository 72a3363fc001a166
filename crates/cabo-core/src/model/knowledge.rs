//! Per-player belief about which card sits in every hand slot.
//!
//! A [`Knowledge`] table belongs to exactly one observer. Entries are written only through
//! [`Knowledge::reveal`]; the game state wraps that in its own `reveal(observer, ...)` so every
//! mutation names the observer whose table changes.

use crate::model::card::Card;
use crate::model::hand::HAND_SIZE;
use crate::model::player::{PLAYER_COUNT, PlayerId};

pub type KnowledgeRow = [Option<Card>; HAND_SIZE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knowledge {
    owner: PlayerId,
    table: [KnowledgeRow; PLAYER_COUNT],
}

impl Knowledge {
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
            table: [[None; HAND_SIZE]; PLAYER_COUNT],
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn get(&self, target: PlayerId, slot: usize) -> Option<Card> {
        self.table[target.index()].get(slot).copied().flatten()
    }

    pub fn row(&self, target: PlayerId) -> &KnowledgeRow {
        &self.table[target.index()]
    }

    /// Records `card` (or forgets the slot when `None`). Slots past the hand limit are ignored.
    pub fn reveal(&mut self, target: PlayerId, slot: usize, card: Option<Card>) {
        if let Some(entry) = self.table[target.index()].get_mut(slot) {
            *entry = card;
        }
    }

    /// Rewrites `target`'s row after the given slots left the hand: surviving entries shift
    /// left in order, `appended` lands in the first free slot and the tail is cleared.
    pub fn compact(&mut self, target: PlayerId, removed: &[usize], appended: Option<Card>) {
        let survivors: Vec<Option<Card>> = self.table[target.index()]
            .iter()
            .enumerate()
            .filter(|(slot, _)| !removed.contains(slot))
            .map(|(_, entry)| *entry)
            .collect();

        let mut next = survivors.into_iter().chain(std::iter::once(appended));
        for slot in 0..HAND_SIZE {
            let entry = next.next().flatten();
            self.reveal(target, slot, entry);
        }
    }

    /// Number of populated entries across the whole table.
    pub fn known_count(&self) -> usize {
        self.table
            .iter()
            .flat_map(|row| row.iter())
            .filter(|entry| entry.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::Knowledge;
    use crate::model::card::Card;
    use crate::model::player::PlayerId;

    fn card(value: u8) -> Card {
        Card::of_value(value, 0).unwrap()
    }

    #[test]
    fn starts_empty() {
        let knowledge = Knowledge::new(PlayerId::HUMAN);
        assert_eq!(knowledge.known_count(), 0);
        assert_eq!(knowledge.get(PlayerId::LOOP[2], 3), None);
    }

    #[test]
    fn reveal_sets_and_clears_entries() {
        let mut knowledge = Knowledge::new(PlayerId::HUMAN);
        let target = PlayerId::LOOP[1];
        knowledge.reveal(target, 2, Some(card(9)));
        assert_eq!(knowledge.get(target, 2), Some(card(9)));
        knowledge.reveal(target, 2, None);
        assert_eq!(knowledge.get(target, 2), None);
    }

    #[test]
    fn reveal_ignores_out_of_range_slots() {
        let mut knowledge = Knowledge::new(PlayerId::HUMAN);
        knowledge.reveal(PlayerId::HUMAN, 7, Some(card(1)));
        assert_eq!(knowledge.known_count(), 0);
    }

    #[test]
    fn compact_shifts_survivors_and_appends() {
        let me = PlayerId::HUMAN;
        let mut knowledge = Knowledge::new(me);
        knowledge.reveal(me, 0, Some(card(3)));
        knowledge.reveal(me, 1, Some(card(6)));
        knowledge.reveal(me, 3, Some(card(3)));

        knowledge.compact(me, &[0, 3], Some(card(1)));

        assert_eq!(
            knowledge.row(me),
            &[Some(card(6)), None, Some(card(1)), None]
        );
    }
}
