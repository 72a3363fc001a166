use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStep {
    SelectOwn,
    SelectOpponent { own_slot: usize },
}

/// Turn lifecycle. Each variant carries only the data its sub-flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Playing,
    PostDrawAction,
    SwappingFromDeck,
    SwappingFromDiscard,
    MultiSwapSelection { selected: Vec<usize> },
    PeekSelf,
    PeekOpponent,
    AbilitySwap { step: SwapStep },
    GameOver,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Playing => "playing",
            Phase::PostDrawAction => "post_draw_action",
            Phase::SwappingFromDeck => "swapping_from_deck",
            Phase::SwappingFromDiscard => "swapping_from_discard",
            Phase::MultiSwapSelection { .. } => "multi_swap_selection",
            Phase::PeekSelf => "ability_peek_self",
            Phase::PeekOpponent => "ability_peek_opponent",
            Phase::AbilitySwap { .. } => "ability_swap",
            Phase::GameOver => "game_over",
        }
    }

    pub const fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver)
    }

    pub fn multi_swap_selection(&self) -> &[usize] {
        match self {
            Phase::MultiSwapSelection { selected } => selected.as_slice(),
            _ => &[],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
