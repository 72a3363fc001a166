use crate::game::state::GameState;
use crate::model::player::{PLAYER_COUNT, PlayerId};
use crate::model::score::RoundResult;
use serde::Serialize;

/// One hand slot as a given viewer may see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// Present when the viewer may see the value.
    pub value: Option<u8>,
    pub face_up: bool,
    /// The viewer's own knowledge (not a face-up flag or game over) supplies the value.
    pub known: bool,
    /// Pending multi-swap selection on the viewer's own hand.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatView {
    pub player: PlayerId,
    pub is_bot: bool,
    pub slots: Vec<SlotView>,
    pub total_score: u32,
}

/// Read-only picture of the table for one viewer, suitable for rendering or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub viewer: PlayerId,
    pub phase: &'static str,
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub deck_size: usize,
    pub discard_top: Option<u8>,
    pub discard_size: usize,
    /// Only shown to the viewer while it is their drawn card.
    pub drawn_card: Option<u8>,
    pub round_end_caller: Option<PlayerId>,
    pub seats: Vec<SeatView>,
    pub win_probability: Option<f64>,
    pub result: Option<RoundResult>,
}

impl TableSnapshot {
    pub fn capture(
        state: &GameState,
        viewer: PlayerId,
        totals: &[u32; PLAYER_COUNT],
        win_probability: Option<f64>,
    ) -> Self {
        let over = state.is_over();
        let selection = state.phase().multi_swap_selection();

        let seats = PlayerId::LOOP
            .iter()
            .map(|&seat| {
                let hand = state.hand(seat);
                let slots = hand
                    .slots()
                    .iter()
                    .enumerate()
                    .map(|(slot, held)| {
                        let remembered = state.knowledge(viewer).get(seat, slot);
                        let value = if over || held.face_up {
                            Some(held.card.value())
                        } else {
                            remembered.map(|card| card.value())
                        };
                        SlotView {
                            value,
                            face_up: held.face_up,
                            known: remembered.is_some(),
                            selected: seat == viewer
                                && seat == state.current_player()
                                && selection.contains(&slot),
                        }
                    })
                    .collect();
                SeatView {
                    player: seat,
                    is_bot: state.player(seat).is_bot(),
                    slots,
                    total_score: totals[seat.index()],
                }
            })
            .collect();

        let drawn_card = if state.current_player() == viewer {
            state.drawn_card().map(|card| card.value())
        } else {
            None
        };

        Self {
            viewer,
            phase: state.phase().as_str(),
            current_player: state.current_player(),
            turn_number: state.turn_number(),
            deck_size: state.deck().len(),
            discard_top: state.discard_top().map(|card| card.value()),
            discard_size: state.discard_pile().len(),
            drawn_card,
            round_end_caller: state.round_end_caller(),
            seats,
            win_probability,
            result: state.result().cloned(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::TableSnapshot;
    use crate::game::rules::RulesConfig;
    use crate::game::state::GameState;
    use crate::model::card::Card;
    use crate::model::player::PlayerId;

    fn card(value: u8, copy: usize) -> Card {
        Card::of_value(value, copy).unwrap()
    }

    fn table() -> GameState {
        GameState::arranged(
            [
                vec![card(5, 0), card(9, 0), card(5, 1), card(2, 0)],
                vec![card(6, 0), card(3, 0), card(12, 0), card(4, 0)],
                vec![card(8, 0), card(0, 0), card(13, 0), card(1, 0)],
                vec![card(10, 0), card(7, 0), card(6, 1), card(3, 1)],
            ],
            vec![card(11, 0), card(1, 1)],
            vec![card(4, 1)],
            [false, true, true, true],
            RulesConfig::default(),
        )
    }

    #[test]
    fn viewer_sees_only_known_slots() {
        let state = table();
        let snapshot = TableSnapshot::capture(&state, PlayerId::HUMAN, &[0; 4], Some(0.4));
        let own = &snapshot.seats[0].slots;
        assert_eq!(own[0].value, Some(5));
        assert_eq!(own[1].value, Some(9));
        assert_eq!(own[2].value, None);
        assert!(snapshot.seats[1].slots.iter().all(|slot| slot.value.is_none()));
        assert_eq!(snapshot.discard_top, Some(4));
        assert_eq!(snapshot.deck_size, 2);
        assert_eq!(snapshot.phase, "playing");
        assert!(!snapshot.seats[0].is_bot);
    }

    #[test]
    fn face_up_cards_are_public_and_drawn_card_is_private() {
        let mut state = table();
        let me = PlayerId::HUMAN;
        state.draw_from_discard(me).unwrap();

        let mine = TableSnapshot::capture(&state, me, &[0; 4], None);
        let theirs = TableSnapshot::capture(&state, PlayerId::LOOP[1], &[0; 4], None);
        assert_eq!(mine.drawn_card, Some(4));
        assert_eq!(theirs.drawn_card, None);

        state.select_slot(me, me, 3).unwrap();
        let theirs = TableSnapshot::capture(&state, PlayerId::LOOP[2], &[0; 4], None);
        assert_eq!(theirs.seats[0].slots[3].value, Some(4));
        assert!(theirs.seats[0].slots[3].face_up);
    }

    #[test]
    fn game_over_reveals_every_hand() {
        let mut state = table();
        state.declare_round_end(PlayerId::HUMAN).unwrap();
        for seat in PlayerId::HUMAN.opponents() {
            state.draw_from_deck(seat).ok();
            state.end_player_turn();
        }
        assert!(state.is_over());
        let snapshot = TableSnapshot::capture(&state, PlayerId::HUMAN, &[0; 4], None);
        assert!(
            snapshot
                .seats
                .iter()
                .all(|seat| seat.slots.iter().all(|slot| slot.value.is_some()))
        );
        assert!(snapshot.result.is_some());
        assert!(snapshot.to_json().unwrap().contains("\"phase\": \"game_over\""));
    }
}
