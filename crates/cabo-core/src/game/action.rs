use crate::model::player::PlayerId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Inbound request from whoever controls the active seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    DrawFromDeck,
    DrawFromDiscard,
    ChooseSwap,
    BeginMultiSwap,
    CancelMultiSwap,
    ConfirmMultiSwap,
    UseAbility,
    DiscardDrawn,
    SelectSlot { player: PlayerId, slot: usize },
    DeclareRoundEnd,
    SkipTurn,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::DrawFromDeck => "draw_from_deck",
            Action::DrawFromDiscard => "draw_from_discard",
            Action::ChooseSwap => "choose_swap",
            Action::BeginMultiSwap => "begin_multi_swap",
            Action::CancelMultiSwap => "cancel_multi_swap",
            Action::ConfirmMultiSwap => "confirm_multi_swap",
            Action::UseAbility => "use_ability",
            Action::DiscardDrawn => "discard_drawn",
            Action::SelectSlot { .. } => "select_slot",
            Action::DeclareRoundEnd => "declare_round_end",
            Action::SkipTurn => "skip_turn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The active player still owes input for this turn.
    Continue,
    /// The turn ended and play moved to the next seat.
    TurnEnded,
    /// The round reached its terminal state.
    RoundOver,
}

/// Rejected request. The `Display` text doubles as the corrective prompt for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    GameOver,
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    WrongPhase { phase: &'static str, action: &'static str },
    DeckEmpty,
    DeckNotEmpty,
    DiscardEmpty,
    NoDrawnCard,
    NoAbility,
    SlotOutOfRange { player: PlayerId, slot: usize },
    MustTargetSelf,
    MustTargetOpponent,
    EmptySelection,
    MismatchedValues,
    RoundEndAlreadyCalled(PlayerId),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::GameOver => f.write_str("the round is over; start the next round"),
            ActionError::NotYourTurn { expected, actual } => {
                write!(f, "it is {expected}'s turn, not {actual}'s")
            }
            ActionError::WrongPhase { phase, action } => {
                write!(f, "cannot {action} during {phase}")
            }
            ActionError::DeckEmpty => f.write_str("the deck is empty; draw from the discard pile"),
            ActionError::DeckNotEmpty => {
                f.write_str("turns may only be skipped once the deck is empty")
            }
            ActionError::DiscardEmpty => f.write_str("the discard pile is empty"),
            ActionError::NoDrawnCard => f.write_str("no drawn card is being held"),
            ActionError::NoAbility => f.write_str("the drawn card has no ability"),
            ActionError::SlotOutOfRange { player, slot } => {
                write!(f, "{player} has no card in slot {}", slot + 1)
            }
            ActionError::MustTargetSelf => f.write_str("choose one of your own cards"),
            ActionError::MustTargetOpponent => f.write_str("choose one of an opponent's cards"),
            ActionError::EmptySelection => f.write_str("select at least one card to exchange"),
            ActionError::MismatchedValues => {
                f.write_str("only cards of the same value can be exchanged together; select again")
            }
            ActionError::RoundEndAlreadyCalled(caller) => {
                write!(f, "{caller} already called the end of the round")
            }
        }
    }
}

impl std::error::Error for ActionError {}
