use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of cards in the canonical deck.
pub const DECK_SIZE: usize = 54;

/// Highest face value in the deck.
pub const MAX_VALUE: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    None,
    PeekSelf,
    PeekOpponent,
    Swap,
}

impl Ability {
    pub const fn for_value(value: u8) -> Self {
        match value {
            7 | 8 => Ability::PeekSelf,
            9 | 10 => Ability::PeekOpponent,
            11 | 12 => Ability::Swap,
            _ => Ability::None,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Ability::None)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Ability::None => "none",
            Ability::PeekSelf => "peek_self",
            Ability::PeekOpponent => "peek_opponent",
            Ability::Swap => "swap",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index into the canonical card-slot table.
///
/// Ids are assigned by the fixed enumeration order of [`crate::model::deck::Deck::canonical`]:
/// `0, 13, 0, 13`, then four copies of each value `1..=12` ascending. Any two decks built
/// from that enumeration agree on the id -> value mapping, which is what lets the estimator
/// treat "known" as a structural lookup instead of a pointer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u8);

impl CardId {
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < DECK_SIZE {
            Some(CardId(raw))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn value(self) -> u8 {
        let id = self.0;
        if id < 4 {
            if id % 2 == 0 { 0 } else { MAX_VALUE }
        } else {
            1 + (id - 4) / 4
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    value: u8,
}

impl Card {
    pub const fn from_id(id: CardId) -> Self {
        Self {
            id,
            value: id.value(),
        }
    }

    pub fn canonical(raw: u8) -> Option<Self> {
        CardId::new(raw).map(Card::from_id)
    }

    /// Returns the `copy`-th canonical card carrying `value`.
    pub fn of_value(value: u8, copy: usize) -> Option<Self> {
        let raw = match value {
            0 if copy < 2 => copy * 2,
            MAX_VALUE if copy < 2 => copy * 2 + 1,
            1..=12 if copy < 4 => 4 + (value as usize - 1) * 4 + copy,
            _ => return None,
        };
        Card::canonical(raw as u8)
    }

    pub const fn id(self) -> CardId {
        self.id
    }

    pub const fn value(self) -> u8 {
        self.value
    }

    pub const fn points(self) -> u32 {
        self.value as u32
    }

    pub const fn ability(self) -> Ability {
        Ability::for_value(self.value)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Ability, Card, CardId, DECK_SIZE};

    #[test]
    fn abilities_follow_value() {
        assert_eq!(Ability::for_value(0), Ability::None);
        assert_eq!(Ability::for_value(6), Ability::None);
        assert_eq!(Ability::for_value(7), Ability::PeekSelf);
        assert_eq!(Ability::for_value(8), Ability::PeekSelf);
        assert_eq!(Ability::for_value(9), Ability::PeekOpponent);
        assert_eq!(Ability::for_value(10), Ability::PeekOpponent);
        assert_eq!(Ability::for_value(11), Ability::Swap);
        assert_eq!(Ability::for_value(12), Ability::Swap);
        assert_eq!(Ability::for_value(13), Ability::None);
    }

    #[test]
    fn canonical_ids_map_to_expected_values() {
        let values: Vec<u8> = (0..8).map(|raw| CardId::new(raw).unwrap().value()).collect();
        assert_eq!(values, vec![0, 13, 0, 13, 1, 1, 1, 1]);
        assert_eq!(CardId::new(53).unwrap().value(), 12);
        assert!(CardId::new(DECK_SIZE as u8).is_none());
    }

    #[test]
    fn of_value_roundtrips_through_ids() {
        for value in 0..=13u8 {
            let copies = if value == 0 || value == 13 { 2 } else { 4 };
            for copy in 0..copies {
                let card = Card::of_value(value, copy).expect("copy exists");
                assert_eq!(card.value(), value);
                assert_eq!(card.id().value(), value);
            }
            assert!(Card::of_value(value, copies).is_none());
        }
    }

    #[test]
    fn points_equal_value() {
        let king = Card::of_value(13, 1).unwrap();
        assert_eq!(king.points(), 13);
        assert_eq!(king.ability(), Ability::None);
    }
}
