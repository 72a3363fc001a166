use crate::game::action::{Action, ActionError, ActionOutcome};
use crate::game::events::{AbilityEffect, DrawSource, GameEvent};
use crate::game::phase::{Phase, SwapStep};
use crate::game::rules::RulesConfig;
use crate::model::card::{Ability, Card};
use crate::model::deck::Deck;
use crate::model::hand::{HAND_SIZE, Hand};
use crate::model::knowledge::Knowledge;
use crate::model::player::{PLAYER_COUNT, Player, PlayerId};
use crate::model::score::RoundResult;
use std::array;
use tracing::{debug, info};

/// Live state of a single round.
#[derive(Debug, Clone)]
pub struct GameState {
    players: [Player; PLAYER_COUNT],
    deck: Deck,
    discard: Vec<Card>,
    current: PlayerId,
    phase: Phase,
    drawn: Option<Card>,
    round_end_caller: Option<PlayerId>,
    last_turn_player: Option<PlayerId>,
    turn_number: u32,
    rules: RulesConfig,
    result: Option<RoundResult>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Deals four cards to every seat (one per pass, in seat order), flips the next card onto
    /// the discard pile and lets everyone look at their own first two slots.
    pub fn deal(mut deck: Deck, bots: [bool; PLAYER_COUNT], rules: RulesConfig) -> Self {
        let mut hands: [Hand; PLAYER_COUNT] = array::from_fn(|_| Hand::new());
        for _ in 0..HAND_SIZE {
            for hand in hands.iter_mut() {
                if let Some(card) = deck.draw() {
                    hand.push(card);
                }
            }
        }
        let discard = deck.draw().into_iter().collect();
        Self::assemble(hands, deck, discard, bots, rules)
    }

    /// Builds a round from an explicit layout. `deck` is drawn from the end; the last entry
    /// of `discard` is the visible top.
    pub fn arranged(
        hands: [Vec<Card>; PLAYER_COUNT],
        deck: Vec<Card>,
        discard: Vec<Card>,
        bots: [bool; PLAYER_COUNT],
        rules: RulesConfig,
    ) -> Self {
        let hands = hands.map(Hand::with_cards);
        Self::assemble(hands, Deck::from_cards(deck), discard, bots, rules)
    }

    fn assemble(
        hands: [Hand; PLAYER_COUNT],
        deck: Deck,
        discard: Vec<Card>,
        bots: [bool; PLAYER_COUNT],
        rules: RulesConfig,
    ) -> Self {
        let mut hands = hands.into_iter();
        let players = array::from_fn(|index| {
            let id = PlayerId::LOOP[index];
            Player::new(id, bots[index], hands.next().unwrap_or_default())
        });

        let mut state = Self {
            players,
            deck,
            discard,
            current: PlayerId::HUMAN,
            phase: Phase::Playing,
            drawn: None,
            round_end_caller: None,
            last_turn_player: None,
            turn_number: 1,
            rules,
            result: None,
            events: Vec::new(),
        };

        for seat in PlayerId::LOOP {
            for slot in 0..2 {
                let card = state.hand(seat).card(slot);
                state.reveal(seat, seat, slot, card);
            }
        }

        state.events.push(GameEvent::RoundStarted {
            first_player: state.current,
            discard_top: state.discard_top().map(Card::value),
        });
        state
    }

    pub fn players(&self) -> &[Player; PLAYER_COUNT] {
        &self.players
    }

    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.players[seat.index()]
    }

    pub fn hand(&self, seat: PlayerId) -> &Hand {
        &self.players[seat.index()].hand
    }

    pub fn knowledge(&self, observer: PlayerId) -> &Knowledge {
        &self.players[observer.index()].knowledge
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn drawn_card(&self) -> Option<Card> {
        self.drawn
    }

    pub fn round_end_caller(&self) -> Option<PlayerId> {
        self.round_end_caller
    }

    pub fn last_turn_player(&self) -> Option<PlayerId> {
        self.last_turn_player
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn rules(&self) -> RulesConfig {
        self.rules
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_game_over()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// What `observer` believes occupies `target`'s `slot`. Face-up cards are public.
    pub fn believed(&self, observer: PlayerId, target: PlayerId, slot: usize) -> Option<Card> {
        let hand = self.hand(target);
        if slot >= hand.len() {
            return None;
        }
        if hand.is_face_up(slot) {
            return hand.card(slot);
        }
        self.knowledge(observer).get(target, slot)
    }

    /// Single write path into any knowledge table.
    pub fn reveal(
        &mut self,
        observer: PlayerId,
        target: PlayerId,
        slot: usize,
        card: Option<Card>,
    ) {
        self.players[observer.index()]
            .knowledge
            .reveal(target, slot, card);
    }

    pub fn apply(&mut self, actor: PlayerId, action: Action) -> Result<ActionOutcome, ActionError> {
        let outcome = match action {
            Action::DrawFromDeck => self.draw_from_deck(actor),
            Action::DrawFromDiscard => self.draw_from_discard(actor),
            Action::ChooseSwap => self.choose_swap(actor),
            Action::BeginMultiSwap => self.begin_multi_swap(actor),
            Action::CancelMultiSwap => self.cancel_multi_swap(actor),
            Action::ConfirmMultiSwap => self.confirm_multi_swap(actor),
            Action::UseAbility => self.use_ability(actor),
            Action::DiscardDrawn => self.discard_drawn(actor),
            Action::SelectSlot { player, slot } => self.select_slot(actor, player, slot),
            Action::DeclareRoundEnd => self.declare_round_end(actor),
            Action::SkipTurn => self.skip_turn(actor),
        };
        if let Err(err) = &outcome {
            debug!(
                target: "cabo_core::round",
                actor = actor.index(),
                phase = self.phase.as_str(),
                action = action.as_str(),
                reason = %err,
                "action rejected"
            );
        }
        outcome
    }

    pub fn draw_from_deck(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "draw from the deck", |phase| {
            matches!(phase, Phase::Playing)
        })?;
        let card = self.deck.draw().ok_or(ActionError::DeckEmpty)?;
        self.drawn = Some(card);
        self.phase = Phase::PostDrawAction;
        self.events.push(GameEvent::CardDrawn {
            player: actor,
            source: DrawSource::Deck,
            value: card.value(),
        });
        Ok(ActionOutcome::Continue)
    }

    pub fn draw_from_discard(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "draw from the discard pile", |phase| {
            matches!(phase, Phase::Playing)
        })?;
        let card = self.discard.pop().ok_or(ActionError::DiscardEmpty)?;
        self.drawn = Some(card);
        self.phase = Phase::SwappingFromDiscard;
        self.events.push(GameEvent::CardDrawn {
            player: actor,
            source: DrawSource::Discard,
            value: card.value(),
        });
        Ok(ActionOutcome::Continue)
    }

    pub fn choose_swap(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "swap", |phase| matches!(phase, Phase::PostDrawAction))?;
        self.phase = Phase::SwappingFromDeck;
        Ok(ActionOutcome::Continue)
    }

    pub fn begin_multi_swap(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "start a multi-swap", |phase| {
            matches!(phase, Phase::PostDrawAction)
        })?;
        self.phase = Phase::MultiSwapSelection {
            selected: Vec::new(),
        };
        Ok(ActionOutcome::Continue)
    }

    pub fn cancel_multi_swap(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "cancel a multi-swap", |phase| {
            matches!(phase, Phase::MultiSwapSelection { .. })
        })?;
        self.phase = Phase::PostDrawAction;
        Ok(ActionOutcome::Continue)
    }

    pub fn confirm_multi_swap(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "confirm a multi-swap", |phase| {
            matches!(phase, Phase::MultiSwapSelection { .. })
        })?;
        let selected = self.phase.multi_swap_selection().to_vec();
        if selected.is_empty() {
            return Err(ActionError::EmptySelection);
        }
        if !self.same_value(actor, &selected) {
            self.phase = Phase::MultiSwapSelection {
                selected: Vec::new(),
            };
            return Err(ActionError::MismatchedValues);
        }
        let incoming = self.drawn.take().ok_or(ActionError::NoDrawnCard)?;
        let matched_value = self.hand(actor).card(selected[0]).map(Card::value).unwrap_or(0);

        self.apply_multi_swap(actor, incoming, &selected);

        let mut slots = selected;
        slots.sort_unstable();
        self.events.push(GameEvent::MultiSwapped {
            player: actor,
            slots,
            matched_value,
            incoming: incoming.value(),
        });
        Ok(self.end_player_turn())
    }

    pub fn use_ability(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "use an ability", |phase| {
            matches!(phase, Phase::PostDrawAction)
        })?;
        let drawn = self.drawn.ok_or(ActionError::NoDrawnCard)?;
        self.phase = match drawn.ability() {
            Ability::None => return Err(ActionError::NoAbility),
            Ability::PeekSelf => Phase::PeekSelf,
            Ability::PeekOpponent => Phase::PeekOpponent,
            Ability::Swap => Phase::AbilitySwap {
                step: SwapStep::SelectOwn,
            },
        };
        Ok(ActionOutcome::Continue)
    }

    /// Declines the drawn card. Only a deck draw may be declined.
    pub fn discard_drawn(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "discard the drawn card", |phase| {
            matches!(phase, Phase::PostDrawAction | Phase::SwappingFromDeck)
        })?;
        let card = self.drawn.take().ok_or(ActionError::NoDrawnCard)?;
        self.discard.push(card);
        self.events.push(GameEvent::DrawnCardDiscarded {
            player: actor,
            value: card.value(),
        });
        Ok(self.end_player_turn())
    }

    pub fn select_slot(
        &mut self,
        actor: PlayerId,
        target: PlayerId,
        slot: usize,
    ) -> Result<ActionOutcome, ActionError> {
        self.ensure_turn(actor)?;
        if slot >= self.hand(target).len() {
            return Err(ActionError::SlotOutOfRange {
                player: target,
                slot,
            });
        }

        match self.phase.clone() {
            Phase::SwappingFromDeck => {
                require_self(actor, target)?;
                self.swap_in(actor, slot, false)
            }
            Phase::SwappingFromDiscard => {
                require_self(actor, target)?;
                self.swap_in(actor, slot, true)
            }
            Phase::MultiSwapSelection { mut selected } => {
                require_self(actor, target)?;
                if let Some(pos) = selected.iter().position(|&index| index == slot) {
                    selected.remove(pos);
                } else {
                    let first_value = selected
                        .first()
                        .and_then(|&index| self.hand(actor).card(index))
                        .map(Card::value);
                    let value = self.hand(actor).card(slot).map(Card::value);
                    if first_value.is_some() && first_value != value {
                        return Err(ActionError::MismatchedValues);
                    }
                    selected.push(slot);
                }
                self.phase = Phase::MultiSwapSelection { selected };
                Ok(ActionOutcome::Continue)
            }
            Phase::PeekSelf => {
                require_self(actor, target)?;
                self.peek(actor, target, slot, Ability::PeekSelf)
            }
            Phase::PeekOpponent => {
                require_opponent(actor, target)?;
                self.peek(actor, target, slot, Ability::PeekOpponent)
            }
            Phase::AbilitySwap {
                step: SwapStep::SelectOwn,
            } => {
                require_self(actor, target)?;
                self.phase = Phase::AbilitySwap {
                    step: SwapStep::SelectOpponent { own_slot: slot },
                };
                Ok(ActionOutcome::Continue)
            }
            Phase::AbilitySwap {
                step: SwapStep::SelectOpponent { own_slot },
            } => {
                require_opponent(actor, target)?;
                self.exchange(actor, own_slot, target, slot)
            }
            phase @ (Phase::Playing | Phase::PostDrawAction | Phase::GameOver) => {
                Err(ActionError::WrongPhase {
                    phase: phase.as_str(),
                    action: "select a card",
                })
            }
        }
    }

    /// Calling on your own turn, before drawing, uses up the turn.
    pub fn declare_round_end(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "call the end of the round", |phase| {
            matches!(phase, Phase::Playing)
        })?;
        self.record_round_end_call(actor, None)?;
        Ok(self.end_player_turn())
    }

    /// Registers `caller`'s round-end call without touching turn order. The round ends once
    /// play comes back around to the caller.
    pub fn record_round_end_call(
        &mut self,
        caller: PlayerId,
        win_probability: Option<f64>,
    ) -> Result<(), ActionError> {
        if self.is_over() {
            return Err(ActionError::GameOver);
        }
        if let Some(existing) = self.round_end_caller {
            return Err(ActionError::RoundEndAlreadyCalled(existing));
        }
        self.round_end_caller = Some(caller);
        self.last_turn_player = Some(caller.previous());
        self.events.push(GameEvent::RoundEndCalled {
            player: caller,
            win_probability,
        });
        Ok(())
    }

    pub fn skip_turn(&mut self, actor: PlayerId) -> Result<ActionOutcome, ActionError> {
        self.ensure_phase(actor, "skip the turn", |phase| matches!(phase, Phase::Playing))?;
        if !self.deck.is_empty() {
            return Err(ActionError::DeckNotEmpty);
        }
        self.events.push(GameEvent::TurnSkipped { player: actor });
        Ok(self.end_player_turn())
    }

    /// Closes the active turn: a still-held drawn card goes to the discard pile, the phase
    /// resets and play moves to the next seat (or the round ends).
    pub fn end_player_turn(&mut self) -> ActionOutcome {
        if self.is_over() {
            return ActionOutcome::RoundOver;
        }
        if let Some(card) = self.drawn.take() {
            self.discard.push(card);
            self.events.push(GameEvent::DrawnCardDiscarded {
                player: self.current,
                value: card.value(),
            });
        }
        self.phase = Phase::Playing;
        self.advance()
    }

    fn advance(&mut self) -> ActionOutcome {
        if self.round_end_caller.is_some() && self.last_turn_player == Some(self.current) {
            self.finish_round();
            return ActionOutcome::RoundOver;
        }

        self.current = self.current.next();
        if self.round_end_caller == Some(self.current) {
            self.finish_round();
            return ActionOutcome::RoundOver;
        }

        if self.round_end_caller.is_none()
            && self
                .rules
                .max_turns
                .is_some_and(|limit| self.turn_number >= limit)
        {
            self.finish_round();
            return ActionOutcome::RoundOver;
        }

        self.turn_number += 1;
        self.events.push(GameEvent::TurnAdvanced {
            player: self.current,
            turn: self.turn_number,
        });
        ActionOutcome::TurnEnded
    }

    fn finish_round(&mut self) {
        if let Some(card) = self.drawn.take() {
            self.discard.push(card);
        }
        self.phase = Phase::GameOver;

        let raw = array::from_fn(|index| self.players[index].hand.points());
        let result = RoundResult::settle(raw, self.round_end_caller, self.rules.penalty);
        info!(
            target: "cabo_core::round",
            raw = ?result.raw,
            penalties = ?result.penalties,
            caller = ?self.round_end_caller.map(PlayerId::index),
            turns = self.turn_number,
            "round ended"
        );
        self.events.push(GameEvent::RoundEnded {
            result: result.clone(),
        });
        self.result = Some(result);
    }

    /// Removes `slots` from `actor`'s hand, appends `incoming` and rewrites the actor's own
    /// knowledge row to match. Other observers keep their (now possibly stale) entries.
    pub(crate) fn apply_multi_swap(&mut self, actor: PlayerId, incoming: Card, slots: &[usize]) {
        let player = &mut self.players[actor.index()];
        let removed = player.hand.remove_slots(slots);
        player.hand.push(incoming);
        player.knowledge.compact(actor, slots, Some(incoming));
        self.discard.extend(removed);
    }

    fn swap_in(
        &mut self,
        actor: PlayerId,
        slot: usize,
        face_up: bool,
    ) -> Result<ActionOutcome, ActionError> {
        let incoming = self.drawn.take().ok_or(ActionError::NoDrawnCard)?;
        let Some(outgoing) = self.players[actor.index()]
            .hand
            .replace(slot, incoming, face_up)
        else {
            self.drawn = Some(incoming);
            return Err(ActionError::SlotOutOfRange {
                player: actor,
                slot,
            });
        };
        self.discard.push(outgoing);

        if face_up {
            for observer in PlayerId::LOOP {
                self.reveal(observer, actor, slot, Some(incoming));
            }
        } else {
            self.reveal(actor, actor, slot, Some(incoming));
        }

        self.events.push(GameEvent::CardSwapped {
            player: actor,
            slot,
            incoming: incoming.value(),
            outgoing: outgoing.value(),
            face_up,
        });
        Ok(self.end_player_turn())
    }

    fn peek(
        &mut self,
        actor: PlayerId,
        target: PlayerId,
        slot: usize,
        ability: Ability,
    ) -> Result<ActionOutcome, ActionError> {
        let card = self.hand(target).card(slot).ok_or(ActionError::SlotOutOfRange {
            player: target,
            slot,
        })?;
        self.reveal(actor, target, slot, Some(card));
        let card_value = self.drawn.map(Card::value).unwrap_or(0);
        self.events.push(GameEvent::AbilityUsed {
            player: actor,
            ability,
            card_value,
            effect: AbilityEffect::Peeked {
                target,
                slot,
                value: card.value(),
            },
        });
        Ok(self.end_player_turn())
    }

    /// Knowledge travels with the physical cards: the actor only learns what they already
    /// knew, while the target sees the card that arrived in their hand.
    fn exchange(
        &mut self,
        actor: PlayerId,
        own_slot: usize,
        target: PlayerId,
        target_slot: usize,
    ) -> Result<ActionOutcome, ActionError> {
        if own_slot >= self.hand(actor).len() {
            return Err(ActionError::SlotOutOfRange {
                player: actor,
                slot: own_slot,
            });
        }
        let own_known = self.knowledge(actor).get(actor, own_slot);
        let target_known = self.knowledge(actor).get(target, target_slot);

        let (low, high) = if actor.index() < target.index() {
            (actor.index(), target.index())
        } else {
            (target.index(), actor.index())
        };
        let (left, right) = self.players.split_at_mut(high);
        let (low_slot, high_slot) = if actor.index() < target.index() {
            (own_slot, target_slot)
        } else {
            (target_slot, own_slot)
        };
        if let (Some(a), Some(b)) = (
            left[low].hand.slot_mut(low_slot),
            right[0].hand.slot_mut(high_slot),
        ) {
            std::mem::swap(a, b);
        }

        let arrived = self.hand(target).card(target_slot);
        self.reveal(actor, actor, own_slot, target_known);
        self.reveal(actor, target, target_slot, own_known);
        self.reveal(target, target, target_slot, arrived);

        let card_value = self.drawn.map(Card::value).unwrap_or(0);
        self.events.push(GameEvent::AbilityUsed {
            player: actor,
            ability: Ability::Swap,
            card_value,
            effect: AbilityEffect::Exchanged {
                own_slot,
                target,
                target_slot,
            },
        });
        Ok(self.end_player_turn())
    }

    fn same_value(&self, actor: PlayerId, slots: &[usize]) -> bool {
        let hand = self.hand(actor);
        let mut values = slots.iter().map(|&slot| hand.card(slot).map(Card::value));
        match values.next() {
            Some(Some(first)) => values.all(|value| value == Some(first)),
            _ => false,
        }
    }

    fn ensure_turn(&self, actor: PlayerId) -> Result<(), ActionError> {
        if self.is_over() {
            return Err(ActionError::GameOver);
        }
        if actor != self.current {
            return Err(ActionError::NotYourTurn {
                expected: self.current,
                actual: actor,
            });
        }
        Ok(())
    }

    fn ensure_phase(
        &self,
        actor: PlayerId,
        action: &'static str,
        allowed: impl Fn(&Phase) -> bool,
    ) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        if !allowed(&self.phase) {
            return Err(ActionError::WrongPhase {
                phase: self.phase.as_str(),
                action,
            });
        }
        Ok(())
    }
}

fn require_self(actor: PlayerId, target: PlayerId) -> Result<(), ActionError> {
    if actor == target {
        Ok(())
    } else {
        Err(ActionError::MustTargetSelf)
    }
}

fn require_opponent(actor: PlayerId, target: PlayerId) -> Result<(), ActionError> {
    if actor != target {
        Ok(())
    } else {
        Err(ActionError::MustTargetOpponent)
    }
}
