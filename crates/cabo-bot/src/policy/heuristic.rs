use super::{Policy, PolicyContext};
use crate::bot::{BotParams, TurnPlanner, TurnReport};
use cabo_core::game::action::ActionError;
use tracing::{Level, event};

/// Threshold-driven bot that leans on the win-probability estimator for its bigger choices.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    name: String,
    params: BotParams,
}

impl HeuristicPolicy {
    pub fn new(params: BotParams) -> Self {
        Self::named("heuristic", params)
    }

    pub fn named(name: impl Into<String>, params: BotParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn from_env() -> Self {
        Self::new(BotParams::from_env())
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new(BotParams::default())
    }
}

impl Policy for HeuristicPolicy {
    fn take_turn(&mut self, ctx: PolicyContext<'_>) -> Result<TurnReport, ActionError> {
        let PolicyContext {
            seat,
            state,
            estimator,
            rng,
        } = ctx;
        let planner = TurnPlanner::new(&self.params, estimator);
        let report = planner.play(state, seat, rng)?;
        log_turn_decision(&self.name, &report);
        if report.called_round_end {
            log_round_end_call(&self.name, &report, self.params.round_end_threshold);
        }
        Ok(report)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn log_turn_decision(policy: &str, report: &TurnReport) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    event!(
        target: "cabo_bot::turn",
        Level::INFO,
        seat = report.seat.index(),
        policy,
        action = report.action.as_str(),
        drawn = ?report.drawn,
        outcome = ?report.outcome,
        win_probability = ?report.win_probability,
    );
}

fn log_round_end_call(policy: &str, report: &TurnReport, threshold: f64) {
    event!(
        target: "cabo_bot::round_end_call",
        Level::INFO,
        seat = report.seat.index(),
        policy,
        win_probability = report.win_probability.unwrap_or_default(),
        threshold,
    );
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::bot::BotParams;
    use crate::policy::{Policy, PolicyContext};
    use cabo_core::estimator::WinProbabilityEstimator;
    use cabo_core::game::match_state::MatchState;
    use cabo_core::model::player::PlayerId;

    #[test]
    fn plays_through_the_policy_trait() {
        let mut match_state = MatchState::with_config(
            21,
            [true; 4],
            cabo_core::game::rules::RulesConfig::default(),
        );
        let estimator = WinProbabilityEstimator::default();
        let mut policy = HeuristicPolicy::named(
            "fast",
            BotParams {
                decision_samples: 200,
                ..BotParams::default()
            },
        );
        assert_eq!(policy.name(), "fast");

        let (state, rng) = match_state.round_and_rng();
        let report = policy
            .take_turn(PolicyContext {
                seat: PlayerId::HUMAN,
                state,
                estimator: &estimator,
                rng,
            })
            .unwrap();
        assert_eq!(report.seat, PlayerId::HUMAN);
        assert_eq!(match_state.round().current_player(), PlayerId::LOOP[1]);
        assert_eq!(match_state.round().drawn_card(), None);
    }
}
