mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::TurnReport;
use cabo_core::estimator::WinProbabilityEstimator;
use cabo_core::game::action::ActionError;
use cabo_core::game::state::GameState;
use cabo_core::model::player::PlayerId;
use rand::RngCore;

/// Everything a policy may touch while it plays one turn.
pub struct PolicyContext<'a> {
    pub seat: PlayerId,
    pub state: &'a mut GameState,
    pub estimator: &'a WinProbabilityEstimator,
    pub rng: &'a mut dyn RngCore,
}

/// Decision-maker for a bot seat.
pub trait Policy: Send {
    /// Plays the whole turn for `ctx.seat`, mutating the state only through its actions.
    fn take_turn(&mut self, ctx: PolicyContext<'_>) -> Result<TurnReport, ActionError>;

    /// Label used in logs and bench output.
    fn name(&self) -> &str {
        "policy"
    }
}
