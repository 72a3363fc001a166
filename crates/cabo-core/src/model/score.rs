use crate::model::player::{PLAYER_COUNT, PlayerId};
use serde::{Deserialize, Serialize};

/// Outcome of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub raw: [u32; PLAYER_COUNT],
    pub penalties: [u32; PLAYER_COUNT],
    pub winners: Vec<PlayerId>,
    pub caller: Option<PlayerId>,
}

impl RoundResult {
    /// Lowest raw total wins (ties share the win). A caller outside the winners is penalised.
    pub fn settle(raw: [u32; PLAYER_COUNT], caller: Option<PlayerId>, penalty: u32) -> Self {
        let min = raw.iter().copied().min().unwrap_or(0);
        let winners: Vec<PlayerId> = PlayerId::LOOP
            .iter()
            .copied()
            .filter(|seat| raw[seat.index()] == min)
            .collect();

        let mut penalties = [0; PLAYER_COUNT];
        if let Some(caller) = caller {
            if !winners.contains(&caller) {
                penalties[caller.index()] = penalty;
            }
        }

        Self {
            raw,
            penalties,
            winners,
            caller,
        }
    }

    pub fn round_total(&self, seat: PlayerId) -> u32 {
        self.raw[seat.index()] + self.penalties[seat.index()]
    }

    pub fn round_totals(&self) -> [u32; PLAYER_COUNT] {
        std::array::from_fn(|index| self.raw[index] + self.penalties[index])
    }

    pub fn is_winner(&self, seat: PlayerId) -> bool {
        self.winners.contains(&seat)
    }

    pub fn caller_failed(&self) -> bool {
        self.caller
            .is_some_and(|caller| self.penalties[caller.index()] > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; PLAYER_COUNT],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            totals: [0; PLAYER_COUNT],
        }
    }

    pub fn add_points(&mut self, seat: PlayerId, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn score(&self, seat: PlayerId) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; PLAYER_COUNT] {
        &self.totals
    }

    pub fn apply_round(&mut self, result: &RoundResult) {
        for seat in PlayerId::LOOP {
            self.add_points(seat, result.round_total(seat));
        }
    }

    pub fn reset(&mut self) {
        self.totals = [0; PLAYER_COUNT];
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundResult, ScoreBoard};
    use crate::model::player::PlayerId;

    const PENALTY: u32 = 10;

    #[test]
    fn failed_caller_is_penalised_and_tied_winners_share() {
        let caller = PlayerId::LOOP[1];
        let result = RoundResult::settle([3, 7, 3, 10], Some(caller), PENALTY);

        assert_eq!(result.winners, vec![PlayerId::LOOP[0], PlayerId::LOOP[2]]);
        assert_eq!(result.round_total(caller), 17);
        assert_eq!(result.round_total(PlayerId::LOOP[0]), 3);
        assert_eq!(result.round_total(PlayerId::LOOP[2]), 3);
        assert_eq!(result.round_total(PlayerId::LOOP[3]), 10);
        assert!(result.caller_failed());
    }

    #[test]
    fn caller_tied_for_lowest_is_not_penalised() {
        let caller = PlayerId::LOOP[2];
        let result = RoundResult::settle([3, 7, 3, 10], Some(caller), PENALTY);
        assert_eq!(result.penalties, [0, 0, 0, 0]);
        assert!(!result.caller_failed());
    }

    #[test]
    fn no_caller_means_no_penalty() {
        let result = RoundResult::settle([9, 2, 5, 5], None, PENALTY);
        assert_eq!(result.winners, vec![PlayerId::LOOP[1]]);
        assert_eq!(result.round_totals(), [9, 2, 5, 5]);
    }

    #[test]
    fn scoreboard_accumulates_round_totals() {
        let mut board = ScoreBoard::new();
        board.apply_round(&RoundResult::settle([3, 7, 3, 10], Some(PlayerId::LOOP[1]), PENALTY));
        board.apply_round(&RoundResult::settle([1, 1, 4, 0], None, PENALTY));
        assert_eq!(board.standings(), &[4, 18, 7, 10]);
    }

    #[test]
    fn reset_clears_totals() {
        let mut board = ScoreBoard::new();
        board.apply_round(&RoundResult::settle([10, 20, 30, 40], None, PENALTY));
        board.reset();
        assert_eq!(board.standings(), &[0, 0, 0, 0]);
    }
}
