use super::{AbilityPlan, BotParams, first_unknown, highest_known, plan_ability};
use cabo_core::estimator::WinProbabilityEstimator;
use cabo_core::game::action::{Action, ActionError, ActionOutcome};
use cabo_core::game::probe;
use cabo_core::game::state::GameState;
use cabo_core::model::card::Card;
use cabo_core::model::player::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// What the bot did with its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    TookDiscard { slot: usize, value: u8 },
    MultiSwap { slots: Vec<usize>, value: u8 },
    UsedAbility(AbilityPlan),
    SwappedDrawn { slot: usize },
    SpeculativeSwap { slot: usize },
    DiscardedDrawn,
    Skipped,
}

impl BotAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotAction::TookDiscard { .. } => "take_discard",
            BotAction::MultiSwap { .. } => "multi_swap",
            BotAction::UsedAbility(plan) => plan.as_str(),
            BotAction::SwappedDrawn { .. } => "swap_drawn",
            BotAction::SpeculativeSwap { .. } => "speculative_swap",
            BotAction::DiscardedDrawn => "discard_drawn",
            BotAction::Skipped => "skip",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub seat: PlayerId,
    pub action: BotAction,
    /// Value of the card taken this turn, from either pile.
    pub drawn: Option<u8>,
    pub outcome: ActionOutcome,
    /// Own estimate after acting, when one was computed.
    pub win_probability: Option<f64>,
    pub called_round_end: bool,
}

/// Runs one complete bot turn against the live state through the public action surface.
#[derive(Debug, Clone, Copy)]
pub struct TurnPlanner<'a> {
    params: &'a BotParams,
    estimator: &'a WinProbabilityEstimator,
}

impl<'a> TurnPlanner<'a> {
    pub fn new(params: &'a BotParams, estimator: &'a WinProbabilityEstimator) -> Self {
        Self { params, estimator }
    }

    pub fn play<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        rng: &mut R,
    ) -> Result<TurnReport, ActionError> {
        if state.is_over() {
            return Err(ActionError::GameOver);
        }
        if state.current_player() != seat {
            return Err(ActionError::NotYourTurn {
                expected: state.current_player(),
                actual: seat,
            });
        }

        let known_high = highest_known(state, seat);
        if let Some(top) = state.discard_top() {
            let worth_taking = top.value() <= self.params.discard_take_max
                && known_high.is_none_or(|(_, value)| top.value() < value);
            if worth_taking {
                let slot = match known_high {
                    Some((slot, _)) => slot,
                    None => random_slot(state, seat, rng),
                };
                state.apply(seat, Action::DrawFromDiscard)?;
                let outcome = state.apply(seat, Action::SelectSlot { player: seat, slot })?;
                let action = BotAction::TookDiscard {
                    slot,
                    value: top.value(),
                };
                return Ok(self.finish(state, seat, action, Some(top.value()), outcome, rng));
            }
        }

        if state.deck().is_empty() {
            let outcome = state.apply(seat, Action::SkipTurn)?;
            return Ok(TurnReport {
                seat,
                action: BotAction::Skipped,
                drawn: None,
                outcome,
                win_probability: None,
                called_round_end: false,
            });
        }

        state.apply(seat, Action::DrawFromDeck)?;
        let drawn = state.drawn_card().ok_or(ActionError::NoDrawnCard)?;

        let (action, outcome) = match self.multi_swap_candidate(state, seat, drawn, rng) {
            Some(slots) => {
                let value = state.hand(seat).card(slots[0]).map(Card::value).unwrap_or(0);
                state.apply(seat, Action::BeginMultiSwap)?;
                for &slot in &slots {
                    state.apply(seat, Action::SelectSlot { player: seat, slot })?;
                }
                let outcome = state.apply(seat, Action::ConfirmMultiSwap)?;
                (BotAction::MultiSwap { slots, value }, outcome)
            }
            None => self.resolve_drawn(state, seat, drawn, rng)?,
        };

        Ok(self.finish(state, seat, action, Some(drawn.value()), outcome, rng))
    }

    /// First same-value group (in ascending value) whose exchange for `drawn` lifts the
    /// estimate by more than the configured gain.
    fn multi_swap_candidate<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        seat: PlayerId,
        drawn: Card,
        rng: &mut R,
    ) -> Option<Vec<usize>> {
        let mut groups: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
        for (slot, card) in state.hand(seat).iter().enumerate() {
            groups.entry(card.value()).or_default().push(slot);
        }

        let samples = self.params.decision_samples;
        let mut before: Option<f64> = None;
        for slots in groups.into_values().filter(|slots| slots.len() > 1) {
            let baseline =
                *before.get_or_insert_with(|| self.estimator.estimate(state, seat, samples, rng));
            let after = probe::evaluate_multi_swap(
                state,
                seat,
                drawn,
                &slots,
                self.estimator,
                samples,
                rng,
            );
            if after > baseline + self.params.multi_swap_gain {
                return Some(slots);
            }
        }
        None
    }

    fn resolve_drawn<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        drawn: Card,
        rng: &mut R,
    ) -> Result<(BotAction, ActionOutcome), ActionError> {
        if let Some(plan) = plan_ability(state, seat, drawn.ability(), self.params, rng) {
            state.apply(seat, Action::UseAbility)?;
            let mut outcome = ActionOutcome::Continue;
            for (player, slot) in plan.selections(seat) {
                outcome = state.apply(seat, Action::SelectSlot { player, slot })?;
            }
            return Ok((BotAction::UsedAbility(plan), outcome));
        }

        if let Some((slot, value)) = highest_known(state, seat) {
            if drawn.value() < value {
                state.apply(seat, Action::ChooseSwap)?;
                let outcome = state.apply(seat, Action::SelectSlot { player: seat, slot })?;
                return Ok((BotAction::SwappedDrawn { slot }, outcome));
            }
        }

        if drawn.value() <= self.params.speculative_swap_max {
            if let Some(slot) = first_unknown(state, seat, seat) {
                state.apply(seat, Action::ChooseSwap)?;
                let outcome = state.apply(seat, Action::SelectSlot { player: seat, slot })?;
                return Ok((BotAction::SpeculativeSwap { slot }, outcome));
            }
        }

        let outcome = state.apply(seat, Action::DiscardDrawn)?;
        Ok((BotAction::DiscardedDrawn, outcome))
    }

    /// Once the turn has been handed on, a confident bot calls the end of the round.
    fn finish<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        seat: PlayerId,
        action: BotAction,
        drawn: Option<u8>,
        outcome: ActionOutcome,
        rng: &mut R,
    ) -> TurnReport {
        let mut report = TurnReport {
            seat,
            action,
            drawn,
            outcome,
            win_probability: None,
            called_round_end: false,
        };
        if state.is_over() || state.round_end_caller().is_some() {
            return report;
        }

        let probability = self
            .estimator
            .estimate(state, seat, self.params.decision_samples, rng);
        report.win_probability = Some(probability);
        if probability >= self.params.round_end_threshold {
            report.called_round_end = state
                .record_round_end_call(seat, Some(probability))
                .is_ok();
        }
        report
    }
}

fn random_slot<R: Rng + ?Sized>(state: &GameState, seat: PlayerId, rng: &mut R) -> usize {
    let slots: Vec<usize> = (0..state.hand(seat).len()).collect();
    slots.choose(rng).copied().unwrap_or(0)
}
