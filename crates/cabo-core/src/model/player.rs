use crate::model::hand::Hand;
use crate::model::knowledge::Knowledge;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Seat reserved for the human player.
    pub const HUMAN: PlayerId = PlayerId(0);

    pub const LOOP: [PlayerId; PLAYER_COUNT] = [PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3)];

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PLAYER_COUNT {
            Some(PlayerId(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self) -> PlayerId {
        PlayerId((self.0 + 1) % PLAYER_COUNT as u8)
    }

    pub const fn previous(self) -> PlayerId {
        PlayerId((self.0 + PLAYER_COUNT as u8 - 1) % PLAYER_COUNT as u8)
    }

    /// Every other seat, in table order starting after `self`.
    pub fn opponents(self) -> impl Iterator<Item = PlayerId> {
        let mut seat = self;
        (1..PLAYER_COUNT).map(move |_| {
            seat = seat.next();
            seat
        })
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == PlayerId::HUMAN {
            f.write_str("You")
        } else {
            write!(f, "Bot {}", self.0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    is_bot: bool,
    pub(crate) hand: Hand,
    pub(crate) knowledge: Knowledge,
}

impl Player {
    pub fn new(id: PlayerId, is_bot: bool, hand: Hand) -> Self {
        Self {
            id,
            is_bot,
            hand,
            knowledge: Knowledge::new(id),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_bot(&self) -> bool {
        self.is_bot
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn next_wraps_around() {
        assert_eq!(PlayerId::LOOP[3].next(), PlayerId::LOOP[0]);
    }

    #[test]
    fn previous_wraps_around() {
        assert_eq!(PlayerId::LOOP[0].previous(), PlayerId::LOOP[3]);
    }

    #[test]
    fn opponents_skip_self_in_table_order() {
        let seats: Vec<_> = PlayerId::LOOP[2].opponents().map(PlayerId::index).collect();
        assert_eq!(seats, vec![3, 0, 1]);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in PlayerId::LOOP.iter().enumerate() {
            assert_eq!(PlayerId::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
        assert_eq!(PlayerId::from_index(4), None);
    }

    #[test]
    fn display_names_human_and_bots() {
        assert_eq!(PlayerId::HUMAN.to_string(), "You");
        assert_eq!(PlayerId::LOOP[2].to_string(), "Bot 2");
    }
}
