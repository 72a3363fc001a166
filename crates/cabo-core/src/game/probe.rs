//! Side-effect-free "what if" evaluation against a copy of the round.

use crate::estimator::WinProbabilityEstimator;
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::player::PlayerId;
use rand::Rng;

/// Returns a copy of `state` in which `player` has exchanged `slots` for `incoming`.
/// The live state is left untouched.
pub fn with_multi_swap(
    state: &GameState,
    player: PlayerId,
    incoming: Card,
    slots: &[usize],
) -> GameState {
    let mut probe = state.clone();
    probe.apply_multi_swap(player, incoming, slots);
    probe
}

/// Win probability for `player` after the hypothetical multi-swap.
pub fn evaluate_multi_swap<R: Rng + ?Sized>(
    state: &GameState,
    player: PlayerId,
    incoming: Card,
    slots: &[usize],
    estimator: &WinProbabilityEstimator,
    samples: usize,
    rng: &mut R,
) -> f64 {
    let probe = with_multi_swap(state, player, incoming, slots);
    estimator.estimate(&probe, player, samples, rng)
}

#[cfg(test)]
mod tests {
    use super::{evaluate_multi_swap, with_multi_swap};
    use crate::estimator::WinProbabilityEstimator;
    use crate::game::rules::RulesConfig;
    use crate::game::state::GameState;
    use crate::model::card::Card;
    use crate::model::player::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(value: u8, copy: usize) -> Card {
        Card::of_value(value, copy).unwrap()
    }

    fn table() -> GameState {
        GameState::arranged(
            [
                vec![card(12, 0), card(12, 1), card(3, 0), card(4, 0)],
                vec![card(6, 0), card(3, 1), card(2, 0), card(4, 1)],
                vec![card(8, 0), card(5, 0), card(9, 0), card(1, 0)],
                vec![card(10, 0), card(7, 0), card(6, 1), card(5, 1)],
            ],
            vec![card(11, 0), card(2, 1)],
            vec![card(4, 2)],
            [true; 4],
            RulesConfig::default(),
        )
    }

    #[test]
    fn probe_leaves_live_state_untouched() {
        let state = table();
        let me = PlayerId::HUMAN;
        let probe = with_multi_swap(&state, me, card(1, 1), &[0, 1]);

        assert_eq!(probe.hand(me).len(), 3);
        assert_eq!(probe.hand(me).card(2), Some(card(1, 1)));
        assert_eq!(probe.knowledge(me).get(me, 2), Some(card(1, 1)));
        assert_eq!(state.hand(me).len(), 4);
        assert_eq!(state.discard_pile().len(), 1);
        assert_eq!(probe.discard_pile().len(), 3);
    }

    #[test]
    fn dropping_a_known_pair_of_twelves_helps() {
        let state = table();
        let me = PlayerId::HUMAN;
        let estimator = WinProbabilityEstimator::default();
        let mut rng = StdRng::seed_from_u64(17);

        let before = estimator.estimate(&state, me, 2000, &mut rng);
        let after = evaluate_multi_swap(
            &state,
            me,
            card(1, 1),
            &[0, 1],
            &estimator,
            2000,
            &mut rng,
        );
        assert!(after > before + 0.1, "before {before}, after {after}");
    }
}
