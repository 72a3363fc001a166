use crate::game::rules::RulesConfig;
use crate::game::state::GameState;
use crate::model::deck::Deck;
use crate::model::player::PLAYER_COUNT;
use crate::model::score::{RoundResult, ScoreBoard};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seat 0 is the human, the rest are bots.
pub const DEFAULT_SEATS: [bool; PLAYER_COUNT] = [false, true, true, true];

/// A sequence of rounds sharing one seeded RNG and one running score table.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: GameState,
    rng: StdRng,
    seed: u64,
    rules: RulesConfig,
    seats: [bool; PLAYER_COUNT],
    scored: bool,
}

impl MatchState {
    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(seed, DEFAULT_SEATS, RulesConfig::default())
    }

    pub fn with_config(seed: u64, seats: [bool; PLAYER_COUNT], rules: RulesConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        let current_round = GameState::deal(deck, seats, rules);

        Self {
            scores: ScoreBoard::new(),
            round_number: 1,
            current_round,
            rng,
            seed,
            rules,
            seats,
            scored: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> RulesConfig {
        self.rules
    }

    pub fn seats(&self) -> [bool; PLAYER_COUNT] {
        self.seats
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn round(&self) -> &GameState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut GameState {
        &mut self.current_round
    }

    /// Live round plus the match RNG, borrowed together for bot turns.
    pub fn round_and_rng(&mut self) -> (&mut GameState, &mut StdRng) {
        (&mut self.current_round, &mut self.rng)
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn is_round_scored(&self) -> bool {
        self.scored
    }

    /// Adds the finished round to the running totals. Repeated calls for the same round are
    /// ignored; returns the result only on the call that applied it.
    pub fn finish_round(&mut self) -> Option<RoundResult> {
        if self.scored {
            return None;
        }
        let result = self.current_round.result()?.clone();
        self.scores.apply_round(&result);
        self.scored = true;
        Some(result)
    }

    /// Scores the current round if needed, then deals the next one. Totals carry over.
    pub fn start_next_round(&mut self) {
        self.finish_round();
        self.round_number += 1;
        self.deal();
    }

    /// Fresh game: totals cleared and round counter reset, RNG stream continues.
    pub fn new_game(&mut self) {
        self.scores.reset();
        self.round_number = 1;
        self.deal();
    }

    fn deal(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = GameState::deal(deck, self.seats, self.rules);
        self.scored = false;
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MatchState;
    use crate::model::player::PlayerId;

    fn play_out(state: &mut MatchState) {
        let human = PlayerId::HUMAN;
        state.round_mut().declare_round_end(human).unwrap();
        for seat in human.opponents() {
            let round = state.round_mut();
            round.draw_from_deck(seat).unwrap();
            round.discard_drawn(seat).unwrap();
        }
    }

    #[test]
    fn same_seed_deals_same_round() {
        let a = MatchState::with_seed(42);
        let b = MatchState::with_seed(42);
        for seat in PlayerId::LOOP {
            let left: Vec<_> = a.round().hand(seat).iter().collect();
            let right: Vec<_> = b.round().hand(seat).iter().collect();
            assert_eq!(left, right);
        }
        assert_eq!(a.round().discard_top(), b.round().discard_top());
    }

    #[test]
    fn finish_round_applies_result_once() {
        let mut state = MatchState::with_seed(3);
        play_out(&mut state);
        assert!(state.round().is_over());

        let result = state.finish_round().unwrap();
        assert_eq!(state.scores().standings(), &result.round_totals());
        assert!(state.finish_round().is_none());
        assert_eq!(state.scores().standings(), &result.round_totals());
    }

    #[test]
    fn next_round_keeps_totals_and_new_game_clears_them() {
        let mut state = MatchState::with_seed(11);
        play_out(&mut state);
        state.start_next_round();
        let totals = *state.scores().standings();
        assert_eq!(state.round_number(), 2);
        assert!(!state.round().is_over());
        assert!(totals.iter().sum::<u32>() > 0);

        state.new_game();
        assert_eq!(state.round_number(), 1);
        assert_eq!(state.scores().standings(), &[0, 0, 0, 0]);
    }

    #[test]
    fn unfinished_round_is_not_scored() {
        let mut state = MatchState::with_seed(5);
        assert!(state.finish_round().is_none());
        assert!(!state.is_round_scored());
    }
}
