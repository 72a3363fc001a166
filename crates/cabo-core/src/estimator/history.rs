use crate::model::player::PLAYER_COUNT;
use serde::Serialize;

/// One sample of every seat's win probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub turn: u32,
    pub label: String,
    pub probs: [f64; PLAYER_COUNT],
}

/// Win-probability series for the current round, one point per turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbabilityHistory {
    points: Vec<HistoryPoint>,
}

impl ProbabilityHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point for `turn`. A repeated turn replaces the previous sample.
    pub fn record(&mut self, turn: u32, probs: [f64; PLAYER_COUNT]) {
        let point = HistoryPoint {
            turn,
            label: format!("T{turn}"),
            probs,
        };
        match self.points.last_mut() {
            Some(last) if last.turn == turn => *last = point,
            _ => self.points.push(point),
        }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    /// Values for one seat, in turn order.
    pub fn series(&self, seat: usize) -> Vec<f64> {
        self.points
            .iter()
            .filter_map(|point| point.probs.get(seat).copied())
            .collect()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
