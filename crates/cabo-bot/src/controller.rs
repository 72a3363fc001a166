use crate::bot::{AbilityPlan, BotAction, TurnReport};
use crate::pacing::{NoopPacer, Pacer, PacingConfig, ThreadSleepPacer};
use crate::policy::{HeuristicPolicy, Policy, PolicyContext};
use cabo_core::estimator::{EstimatorConfig, ProbabilityHistory, WinProbabilityEstimator};
use cabo_core::game::action::{Action, ActionError, ActionOutcome};
use cabo_core::game::events::GameEvent;
use cabo_core::game::match_state::{DEFAULT_SEATS, MatchState};
use cabo_core::game::phase::Phase;
use cabo_core::game::rules::RulesConfig;
use cabo_core::game::serialization::TableSnapshot;
use cabo_core::game::state::GameState;
use cabo_core::model::player::{PLAYER_COUNT, PlayerId};
use cabo_core::model::score::RoundResult;
use std::array;
use tracing::{info, warn};

/// Drives a match: human actions come in through [`GameController::act`], bot seats are
/// delegated to their policies, and every handed-on turn adds a probability-history point.
pub struct GameController {
    match_state: MatchState,
    policies: [Option<Box<dyn Policy>>; PLAYER_COUNT],
    estimator: WinProbabilityEstimator,
    history: ProbabilityHistory,
    track_history: bool,
    pacing: PacingConfig,
    pacer: Box<dyn Pacer>,
    log: Vec<GameEvent>,
}

impl GameController {
    /// Human in seat 0 against three heuristic bots, paced for a person watching.
    pub fn new_with_seed(seed: Option<u64>) -> Self {
        let match_state = match seed {
            Some(seed) => MatchState::with_seed(seed),
            None => MatchState::new(),
        };
        let policies = array::from_fn(|index| {
            DEFAULT_SEATS[index]
                .then(|| Box::new(HeuristicPolicy::from_env()) as Box<dyn Policy>)
        });
        Self::with_parts(
            match_state,
            policies,
            WinProbabilityEstimator::default(),
            PacingConfig::default(),
            Box::new(ThreadSleepPacer),
        )
    }

    /// Four bots, no delays, no history. Used for self-play; the round is always turn-capped.
    pub fn headless(
        seed: u64,
        policies: [Box<dyn Policy>; PLAYER_COUNT],
        estimator: EstimatorConfig,
        rules: RulesConfig,
    ) -> Self {
        let match_state = MatchState::with_config(seed, [true; PLAYER_COUNT], rules.capped());
        Self::assemble(
            match_state,
            policies.map(Some),
            WinProbabilityEstimator::new(estimator),
            PacingConfig::instant(),
            Box::new(NoopPacer),
            false,
        )
    }

    pub fn with_parts(
        match_state: MatchState,
        policies: [Option<Box<dyn Policy>>; PLAYER_COUNT],
        estimator: WinProbabilityEstimator,
        pacing: PacingConfig,
        pacer: Box<dyn Pacer>,
    ) -> Self {
        Self::assemble(match_state, policies, estimator, pacing, pacer, true)
    }

    fn assemble(
        match_state: MatchState,
        policies: [Option<Box<dyn Policy>>; PLAYER_COUNT],
        estimator: WinProbabilityEstimator,
        pacing: PacingConfig,
        pacer: Box<dyn Pacer>,
        track_history: bool,
    ) -> Self {
        let mut controller = Self {
            match_state,
            policies,
            estimator,
            history: ProbabilityHistory::new(),
            track_history,
            pacing,
            pacer,
            log: Vec::new(),
        };
        controller.begin_round();
        controller
    }

    pub fn set_history_tracking(&mut self, enabled: bool) {
        self.track_history = enabled;
        if !enabled {
            self.history.clear();
        }
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn round(&self) -> &GameState {
        self.match_state.round()
    }

    pub fn history(&self) -> &ProbabilityHistory {
        &self.history
    }

    pub fn standings(&self) -> [u32; PLAYER_COUNT] {
        *self.match_state.scores().standings()
    }

    pub fn is_bot_turn(&self) -> bool {
        let round = self.round();
        !round.is_over() && self.policies[round.current_player().index()].is_some()
    }

    /// Events published since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.collect_events();
        std::mem::take(&mut self.log)
    }

    /// Applies an inbound action for the human seat.
    pub fn act(&mut self, action: Action) -> Result<ActionOutcome, ActionError> {
        let revealing = matches!(
            self.round().phase(),
            Phase::PeekSelf | Phase::PeekOpponent
        ) && matches!(action, Action::SelectSlot { .. });

        let outcome = self
            .match_state
            .round_mut()
            .apply(PlayerId::HUMAN, action)?;
        if revealing {
            self.pacer.pause(self.pacing.reveal_delay);
        }
        self.after_action(outcome);
        Ok(outcome)
    }

    /// Plays one bot turn if a bot is to act.
    pub fn step_bot(&mut self) -> Option<TurnReport> {
        if !self.is_bot_turn() {
            return None;
        }
        self.pacer.pause(self.pacing.bot_turn_delay);

        let seat = self.round().current_player();
        let (state, rng) = self.match_state.round_and_rng();
        let policy = self.policies[seat.index()].as_mut()?;
        let result = policy.take_turn(PolicyContext {
            seat,
            state,
            estimator: &self.estimator,
            rng,
        });

        match result {
            Ok(report) => {
                if matches!(
                    report.action,
                    BotAction::UsedAbility(
                        AbilityPlan::PeekSelf { .. } | AbilityPlan::PeekOpponent { .. }
                    )
                ) {
                    self.pacer.pause(self.pacing.reveal_delay);
                }
                self.after_action(report.outcome);
                Some(report)
            }
            Err(err) => {
                warn!(
                    target: "cabo_bot::turn",
                    seat = seat.index(),
                    error = %err,
                    "bot turn failed; ending the turn"
                );
                let outcome = self.match_state.round_mut().end_player_turn();
                self.after_action(outcome);
                None
            }
        }
    }

    /// Plays bot turns until a human is to act or the round ends.
    pub fn run_bots(&mut self) -> Vec<TurnReport> {
        let mut reports = Vec::new();
        while self.is_bot_turn() {
            let before = self.round().turn_number();
            match self.step_bot() {
                Some(report) => reports.push(report),
                None if self.round().turn_number() == before && !self.round().is_over() => break,
                None => {}
            }
        }
        reports
    }

    /// Plays the current round to the end. Returns `None` if a human seat is to act.
    pub fn autoplay_round(&mut self) -> Option<RoundResult> {
        while !self.round().is_over() {
            if !self.is_bot_turn() {
                return None;
            }
            let before = self.round().turn_number();
            self.step_bot();
            if !self.round().is_over() && self.round().turn_number() == before {
                return None;
            }
        }
        self.match_state.round().result().cloned()
    }

    /// Human-facing win chance at decision resolution.
    pub fn win_probability(&mut self, seat: PlayerId) -> f64 {
        let (state, rng) = self.match_state.round_and_rng();
        self.estimator.decision(state, seat, rng)
    }

    pub fn snapshot(&self, viewer: PlayerId, win_probability: Option<f64>) -> TableSnapshot {
        TableSnapshot::capture(
            self.round(),
            viewer,
            self.match_state.scores().standings(),
            win_probability,
        )
    }

    /// Scores the finished round (once) and deals the next one.
    pub fn next_round(&mut self) {
        self.collect_events();
        self.match_state.start_next_round();
        self.begin_round();
    }

    /// Clears the running totals and deals a fresh first round.
    pub fn new_game(&mut self) {
        self.collect_events();
        self.match_state.new_game();
        self.begin_round();
    }

    fn begin_round(&mut self) {
        self.history.clear();
        self.record_history();
    }

    fn after_action(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Continue => {}
            ActionOutcome::TurnEnded => {
                self.record_history();
                self.pacer.pause(self.pacing.advance_delay);
            }
            ActionOutcome::RoundOver => {
                if let Some(result) = self.match_state.finish_round() {
                    info!(
                        target: "cabo_bot::round",
                        round = self.match_state.round_number(),
                        raw = ?result.raw,
                        penalties = ?result.penalties,
                        totals = ?self.match_state.scores().standings(),
                        "round scored"
                    );
                }
            }
        }
        self.collect_events();
    }

    fn record_history(&mut self) {
        if !self.track_history {
            return;
        }
        let (state, rng) = self.match_state.round_and_rng();
        let probs = self.estimator.all_players(state, rng);
        let turn = state.turn_number();
        self.history.record(turn, probs);
    }

    fn collect_events(&mut self) {
        let events = self.match_state.round_mut().drain_events();
        self.log.extend(events);
    }
}
