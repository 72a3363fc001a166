use super::{BotParams, first_unknown, highest_known};
use cabo_core::game::state::GameState;
use cabo_core::model::card::Ability;
use cabo_core::model::player::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;

/// Concrete target(s) chosen for a drawn card's ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityPlan {
    PeekSelf {
        slot: usize,
    },
    PeekOpponent {
        target: PlayerId,
        slot: usize,
    },
    /// Trade a known high card for the lowest known opponent card.
    KnownSwap {
        own_slot: usize,
        target: PlayerId,
        target_slot: usize,
    },
    /// Trade a known high card for an opponent card nobody has shown us.
    BlindSwap {
        own_slot: usize,
        target: PlayerId,
        target_slot: usize,
    },
}

impl AbilityPlan {
    /// Slot selections that resolve this plan, in order.
    pub fn selections(self, seat: PlayerId) -> Vec<(PlayerId, usize)> {
        match self {
            AbilityPlan::PeekSelf { slot } => vec![(seat, slot)],
            AbilityPlan::PeekOpponent { target, slot } => vec![(target, slot)],
            AbilityPlan::KnownSwap {
                own_slot,
                target,
                target_slot,
            }
            | AbilityPlan::BlindSwap {
                own_slot,
                target,
                target_slot,
            } => vec![(seat, own_slot), (target, target_slot)],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AbilityPlan::PeekSelf { .. } => "peek_self",
            AbilityPlan::PeekOpponent { .. } => "peek_opponent",
            AbilityPlan::KnownSwap { .. } => "known_swap",
            AbilityPlan::BlindSwap { .. } => "blind_swap",
        }
    }
}

/// Picks targets for `ability`, or `None` when using it would not help.
pub fn plan_ability<R: Rng + ?Sized>(
    state: &GameState,
    seat: PlayerId,
    ability: Ability,
    params: &BotParams,
    rng: &mut R,
) -> Option<AbilityPlan> {
    match ability {
        Ability::None => None,
        Ability::PeekSelf => {
            first_unknown(state, seat, seat).map(|slot| AbilityPlan::PeekSelf { slot })
        }
        Ability::PeekOpponent => shuffled_opponents(seat, rng)
            .into_iter()
            .find_map(|target| {
                first_unknown(state, seat, target)
                    .map(|slot| AbilityPlan::PeekOpponent { target, slot })
            }),
        Ability::Swap => plan_swap(state, seat, params, rng),
    }
}

fn plan_swap<R: Rng + ?Sized>(
    state: &GameState,
    seat: PlayerId,
    params: &BotParams,
    rng: &mut R,
) -> Option<AbilityPlan> {
    let (own_slot, own_value) = highest_known(state, seat)?;
    if own_value <= params.swap_ability_min {
        return None;
    }

    let mut lowest: Option<(PlayerId, usize, u8)> = None;
    for target in seat.opponents() {
        for slot in 0..state.hand(target).len() {
            if let Some(card) = state.believed(seat, target, slot) {
                if lowest.is_none_or(|(_, _, value)| card.value() < value) {
                    lowest = Some((target, slot, card.value()));
                }
            }
        }
    }
    if let Some((target, target_slot, value)) = lowest {
        if own_value > value {
            return Some(AbilityPlan::KnownSwap {
                own_slot,
                target,
                target_slot,
            });
        }
    }

    shuffled_opponents(seat, rng).into_iter().find_map(|target| {
        first_unknown(state, seat, target).map(|target_slot| AbilityPlan::BlindSwap {
            own_slot,
            target,
            target_slot,
        })
    })
}

fn shuffled_opponents<R: Rng + ?Sized>(seat: PlayerId, rng: &mut R) -> Vec<PlayerId> {
    let mut opponents: Vec<PlayerId> = seat.opponents().collect();
    opponents.shuffle(rng);
    opponents
}

#[cfg(test)]
mod tests {
    use super::{AbilityPlan, plan_ability};
    use crate::bot::BotParams;
    use cabo_core::game::rules::RulesConfig;
    use cabo_core::game::state::GameState;
    use cabo_core::model::card::{Ability, Card};
    use cabo_core::model::player::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(value: u8, copy: usize) -> Card {
        Card::of_value(value, copy).unwrap()
    }

    fn seat(index: usize) -> PlayerId {
        PlayerId::LOOP[index]
    }

    /// Bot 1 knows [12, 3] and nothing else.
    fn table() -> GameState {
        GameState::arranged(
            [
                vec![card(5, 0), card(9, 0), card(5, 1), card(2, 0)],
                vec![card(12, 0), card(3, 0), card(8, 0), card(4, 0)],
                vec![card(8, 1), card(0, 0), card(13, 0), card(1, 0)],
                vec![card(10, 0), card(7, 0), card(6, 1), card(3, 1)],
            ],
            Vec::new(),
            vec![card(4, 1)],
            [false, true, true, true],
            RulesConfig::default(),
        )
    }

    #[test]
    fn peek_self_targets_first_unknown_slot() {
        let state = table();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_ability(
            &state,
            seat(1),
            Ability::PeekSelf,
            &BotParams::default(),
            &mut rng,
        );
        assert_eq!(plan, Some(AbilityPlan::PeekSelf { slot: 2 }));
    }

    #[test]
    fn peek_self_is_skipped_when_hand_is_fully_known() {
        let mut state = table();
        for slot in 2..4 {
            let card = state.hand(seat(1)).card(slot);
            state.reveal(seat(1), seat(1), slot, card);
        }
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_ability(
            &state,
            seat(1),
            Ability::PeekSelf,
            &BotParams::default(),
            &mut rng,
        );
        assert_eq!(plan, None);
    }

    #[test]
    fn peek_opponent_picks_an_unknown_opponent_slot() {
        let state = table();
        let mut rng = StdRng::seed_from_u64(2);
        match plan_ability(
            &state,
            seat(1),
            Ability::PeekOpponent,
            &BotParams::default(),
            &mut rng,
        ) {
            Some(AbilityPlan::PeekOpponent { target, slot }) => {
                assert_ne!(target, seat(1));
                assert_eq!(slot, 0);
            }
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn swap_prefers_lowest_known_opponent_card() {
        let mut state = table();
        state.reveal(seat(1), seat(2), 3, Some(card(1, 0)));
        state.reveal(seat(1), seat(3), 0, Some(card(10, 0)));
        let mut rng = StdRng::seed_from_u64(3);
        let plan = plan_ability(&state, seat(1), Ability::Swap, &BotParams::default(), &mut rng);
        assert_eq!(
            plan,
            Some(AbilityPlan::KnownSwap {
                own_slot: 0,
                target: seat(2),
                target_slot: 3
            })
        );
    }

    #[test]
    fn swap_falls_back_to_a_blind_trade() {
        let state = table();
        let mut rng = StdRng::seed_from_u64(4);
        match plan_ability(&state, seat(1), Ability::Swap, &BotParams::default(), &mut rng) {
            Some(AbilityPlan::BlindSwap {
                own_slot, target, ..
            }) => {
                assert_eq!(own_slot, 0);
                assert_ne!(target, seat(1));
            }
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn swap_needs_a_high_known_card() {
        let state = table();
        let mut rng = StdRng::seed_from_u64(5);
        let plan = plan_ability(&state, seat(3), Ability::Swap, &BotParams::default(), &mut rng);
        // Bot 3 knows 10 and 7, both above the minimum.
        assert!(plan.is_some());

        let params = BotParams {
            swap_ability_min: 10,
            ..BotParams::default()
        };
        assert_eq!(plan_ability(&state, seat(3), Ability::Swap, &params, &mut rng), None);
    }
}
