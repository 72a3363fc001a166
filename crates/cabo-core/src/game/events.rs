//! Notifications published by the round for logging and display collaborators.

use crate::model::card::Ability;
use crate::model::player::PlayerId;
use crate::model::score::RoundResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AbilityEffect {
    Peeked {
        target: PlayerId,
        slot: usize,
        value: u8,
    },
    Exchanged {
        own_slot: usize,
        target: PlayerId,
        target_slot: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        first_player: PlayerId,
        discard_top: Option<u8>,
    },
    CardDrawn {
        player: PlayerId,
        source: DrawSource,
        value: u8,
    },
    CardSwapped {
        player: PlayerId,
        slot: usize,
        incoming: u8,
        outgoing: u8,
        face_up: bool,
    },
    DrawnCardDiscarded {
        player: PlayerId,
        value: u8,
    },
    MultiSwapped {
        player: PlayerId,
        slots: Vec<usize>,
        matched_value: u8,
        incoming: u8,
    },
    AbilityUsed {
        player: PlayerId,
        ability: Ability,
        card_value: u8,
        effect: AbilityEffect,
    },
    TurnSkipped {
        player: PlayerId,
    },
    RoundEndCalled {
        player: PlayerId,
        win_probability: Option<f64>,
    },
    TurnAdvanced {
        player: PlayerId,
        turn: u32,
    },
    RoundEnded {
        result: RoundResult,
    },
}

impl GameEvent {
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            GameEvent::CardDrawn { player, .. }
            | GameEvent::CardSwapped { player, .. }
            | GameEvent::DrawnCardDiscarded { player, .. }
            | GameEvent::MultiSwapped { player, .. }
            | GameEvent::AbilityUsed { player, .. }
            | GameEvent::TurnSkipped { player }
            | GameEvent::RoundEndCalled { player, .. }
            | GameEvent::TurnAdvanced { player, .. } => Some(*player),
            GameEvent::RoundStarted { .. } | GameEvent::RoundEnded { .. } => None,
        }
    }

    /// One-line text for the action log.
    pub fn describe(&self) -> String {
        match self {
            GameEvent::RoundStarted { discard_top, .. } => match discard_top {
                Some(value) => format!("New round started; discard pile shows {value}"),
                None => "New round started".to_string(),
            },
            GameEvent::CardDrawn {
                player,
                source,
                value,
            } => match source {
                DrawSource::Deck => format!("{player} drew {value} from the deck"),
                DrawSource::Discard => format!("{player} took {value} from the discard pile"),
            },
            GameEvent::CardSwapped {
                player,
                slot,
                incoming,
                outgoing,
                face_up,
            } => {
                let visibility = if *face_up { " (stays face up)" } else { "" };
                format!(
                    "{player} swapped {incoming} into slot {} replacing {outgoing}{visibility}",
                    slot + 1
                )
            }
            GameEvent::DrawnCardDiscarded { player, value } => {
                format!("{player} discarded the drawn {value}")
            }
            GameEvent::MultiSwapped {
                player,
                slots,
                matched_value,
                incoming,
            } => format!(
                "{player} exchanged {} x {matched_value} for {incoming}",
                slots.len()
            ),
            GameEvent::AbilityUsed {
                player,
                ability,
                card_value,
                effect,
            } => match effect {
                AbilityEffect::Peeked {
                    target,
                    slot,
                    value,
                } if target == player => format!(
                    "{player} used {card_value} ({ability}) and looked at own slot {} ({value})",
                    slot + 1
                ),
                AbilityEffect::Peeked { target, slot, .. } => format!(
                    "{player} used {card_value} ({ability}) and looked at {target}'s slot {}",
                    slot + 1
                ),
                AbilityEffect::Exchanged {
                    own_slot,
                    target,
                    target_slot,
                } => format!(
                    "{player} used {card_value} ({ability}) trading slot {} with {target}'s slot {}",
                    own_slot + 1,
                    target_slot + 1
                ),
            },
            GameEvent::TurnSkipped { player } => {
                format!("{player} found the deck empty and skipped the turn")
            }
            GameEvent::RoundEndCalled {
                player,
                win_probability,
            } => match win_probability {
                Some(p) => format!("{player} called Cabo! (win chance {:.1}%)", p * 100.0),
                None => format!("{player} called Cabo!"),
            },
            GameEvent::TurnAdvanced { player, turn } => format!("T{turn}: {player} to play"),
            GameEvent::RoundEnded { result } => {
                let winners = result
                    .winners
                    .iter()
                    .map(|seat| seat.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Round over; lowest hand: {winners}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AbilityEffect, DrawSource, GameEvent};
    use crate::model::card::Ability;
    use crate::model::player::PlayerId;

    #[test]
    fn actor_is_reported_for_player_events() {
        let event = GameEvent::CardDrawn {
            player: PlayerId::LOOP[2],
            source: DrawSource::Deck,
            value: 4,
        };
        assert_eq!(event.actor(), Some(PlayerId::LOOP[2]));
        assert!(event.describe().contains("drew 4"));
    }

    #[test]
    fn opponent_peek_does_not_leak_value_in_log() {
        let event = GameEvent::AbilityUsed {
            player: PlayerId::LOOP[1],
            ability: Ability::PeekOpponent,
            card_value: 9,
            effect: AbilityEffect::Peeked {
                target: PlayerId::LOOP[3],
                slot: 0,
                value: 12,
            },
        };
        let text = event.describe();
        assert!(text.contains("Bot 3's slot 1"));
        assert!(!text.contains("12"));
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = GameEvent::TurnSkipped {
            player: PlayerId::HUMAN,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"turn_skipped","player":0}"#);
    }
}
