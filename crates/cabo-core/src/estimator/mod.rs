//! Monte-Carlo win-probability estimation from one player's point of view.
//!
//! This module is composed of:
//! - `pool`: the unknown-card pool a perspective player cannot yet place.
//! - `history`: per-turn probability series for every seat.

mod history;
mod pool;

pub use history::{HistoryPoint, ProbabilityHistory};
pub use pool::UnknownPool;

use crate::game::state::GameState;
use crate::model::player::{PLAYER_COUNT, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;

/// Expected points of a card nobody can place.
pub const FALLBACK_POINTS: f64 = 6.5;

/// Samples used for decisions taken right now (human hint, bot choices).
pub const DECISION_SAMPLES: usize = 3000;

/// Samples used for the per-turn history series.
pub const HISTORY_SAMPLES: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pub decision_samples: usize,
    pub history_samples: usize,
    pub fallback_points: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            decision_samples: DECISION_SAMPLES,
            history_samples: HISTORY_SAMPLES,
            fallback_points: FALLBACK_POINTS,
        }
    }
}

/// Estimates the chance that a seat ends the round holding the (possibly shared) lowest hand.
///
/// The live state is only read; every trial works on a local copy of the unknown pool.
#[derive(Debug, Clone, Default)]
pub struct WinProbabilityEstimator {
    config: EstimatorConfig,
}

impl WinProbabilityEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Fraction of `samples` simulated deals in which `perspective` scores at or below every
    /// other seat. With nothing left to sample a single trial settles the answer.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        perspective: PlayerId,
        samples: usize,
        rng: &mut R,
    ) -> f64 {
        if state.is_over() || state.hand(perspective).is_empty() || samples == 0 {
            return 0.0;
        }

        let pool = UnknownPool::build(state, perspective);
        let trials = if pool.is_empty() { 1 } else { samples };
        let mut cards = pool.into_cards();
        let mut wins = 0usize;

        for _ in 0..trials {
            cards.shuffle(rng);
            let mut unknown = cards.iter();
            let mut scores = [0.0f64; PLAYER_COUNT];

            for seat in PlayerId::LOOP {
                for slot in 0..state.hand(seat).len() {
                    let points = match state.believed(perspective, seat, slot) {
                        Some(card) => f64::from(card.points()),
                        None => unknown
                            .next()
                            .map(|card| f64::from(card.points()))
                            .unwrap_or(self.config.fallback_points),
                    };
                    scores[seat.index()] += points;
                }
            }

            let lowest = scores.iter().copied().fold(f64::INFINITY, f64::min);
            if scores[perspective.index()] <= lowest {
                wins += 1;
            }
        }

        wins as f64 / trials as f64
    }

    /// Estimate sized for an immediate decision.
    pub fn decision<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        perspective: PlayerId,
        rng: &mut R,
    ) -> f64 {
        self.estimate(state, perspective, self.config.decision_samples, rng)
    }

    /// Every seat's estimate at history resolution.
    pub fn all_players<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> [f64; PLAYER_COUNT] {
        let mut probs = [0.0; PLAYER_COUNT];
        for seat in PlayerId::LOOP {
            probs[seat.index()] = self.estimate(state, seat, self.config.history_samples, rng);
        }
        probs
    }
}

#[cfg(test)]
mod tests {
    use super::WinProbabilityEstimator;
    use crate::game::rules::RulesConfig;
    use crate::game::state::GameState;
    use crate::model::card::{Card, DECK_SIZE};
    use crate::model::deck::Deck;
    use crate::model::player::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Every card dealt out, with all remaining cards on the discard pile.
    fn settled(values: [[u8; 2]; 4]) -> GameState {
        let mut remaining: Vec<Card> = (0..DECK_SIZE as u8).filter_map(Card::canonical).collect();
        let mut take = |value: u8| {
            let pos = remaining.iter().position(|card| card.value() == value).unwrap();
            remaining.remove(pos)
        };
        let hands = values.map(|pair| vec![take(pair[0]), take(pair[1])]);
        GameState::arranged(hands, Vec::new(), remaining, [true; 4], RulesConfig::default())
    }

    fn reveal_all(state: &mut GameState, observer: PlayerId) {
        for seat in PlayerId::LOOP {
            for slot in 0..state.hand(seat).len() {
                let card = state.hand(seat).card(slot);
                state.reveal(observer, seat, slot, card);
            }
        }
    }

    #[test]
    fn empty_pool_gives_one_for_unique_minimum() {
        let mut state = settled([[1, 2], [5, 5], [6, 7], [12, 13]]);
        reveal_all(&mut state, PlayerId::HUMAN);
        reveal_all(&mut state, PlayerId::LOOP[2]);
        let mut rng = StdRng::seed_from_u64(1);
        let estimator = WinProbabilityEstimator::default();
        assert_eq!(estimator.estimate(&state, PlayerId::HUMAN, 500, &mut rng), 1.0);
        assert_eq!(estimator.estimate(&state, PlayerId::LOOP[2], 500, &mut rng), 0.0);
    }

    #[test]
    fn empty_pool_tie_counts_as_win() {
        let mut state = settled([[1, 4], [2, 3], [6, 7], [12, 13]]);
        reveal_all(&mut state, PlayerId::LOOP[1]);
        let mut rng = StdRng::seed_from_u64(2);
        let estimator = WinProbabilityEstimator::default();
        assert_eq!(estimator.estimate(&state, PlayerId::LOOP[1], 100, &mut rng), 1.0);
    }

    #[test]
    fn zero_samples_and_finished_rounds_return_zero() {
        let mut state = settled([[1, 2], [5, 5], [6, 7], [12, 13]]);
        let mut rng = StdRng::seed_from_u64(3);
        let estimator = WinProbabilityEstimator::default();
        assert_eq!(estimator.estimate(&state, PlayerId::HUMAN, 0, &mut rng), 0.0);

        state.declare_round_end(PlayerId::HUMAN).unwrap();
        for seat in PlayerId::HUMAN.opponents() {
            state.skip_turn(seat).unwrap();
        }
        assert!(state.is_over());
        assert_eq!(estimator.estimate(&state, PlayerId::HUMAN, 500, &mut rng), 0.0);
    }

    #[test]
    fn estimates_stay_in_unit_interval_and_leave_state_untouched() {
        let state = GameState::deal(
            Deck::shuffled_with_seed(9),
            [false, true, true, true],
            RulesConfig::default(),
        );
        let before: Vec<_> = PlayerId::LOOP
            .iter()
            .map(|&seat| state.knowledge(seat).clone())
            .collect();
        let mut rng = StdRng::seed_from_u64(4);
        let estimator = WinProbabilityEstimator::default();

        let probs = estimator.all_players(&state, &mut rng);
        for p in probs {
            assert!((0.0..=1.0).contains(&p));
        }
        let after: Vec<_> = PlayerId::LOOP
            .iter()
            .map(|&seat| state.knowledge(seat).clone())
            .collect();
        assert_eq!(before, after);
        assert_eq!(state.deck().len(), 54 - 17);
    }

    #[test]
    fn known_zero_hand_always_wins() {
        let state = settled([[0, 0], [9, 9], [10, 10], [11, 11]]);
        let mut rng = StdRng::seed_from_u64(5);
        let estimator = WinProbabilityEstimator::default();
        let p = estimator.decision(&state, PlayerId::HUMAN, &mut rng);
        assert_eq!(p, 1.0);
    }
}
