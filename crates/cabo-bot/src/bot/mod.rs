mod ability;
mod params;
mod turn;

pub use ability::{AbilityPlan, plan_ability};
pub use params::BotParams;
pub use turn::{BotAction, TurnPlanner, TurnReport};

use cabo_core::game::state::GameState;
use cabo_core::model::player::PlayerId;

/// Highest card `seat` knows in its own hand as `(slot, value)`. Ties keep the lowest slot.
pub fn highest_known(state: &GameState, seat: PlayerId) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;
    for slot in 0..state.hand(seat).len() {
        if let Some(card) = state.believed(seat, seat, slot) {
            if best.is_none_or(|(_, value)| card.value() > value) {
                best = Some((slot, card.value()));
            }
        }
    }
    best
}

/// First slot of `target`'s hand that `observer` cannot place.
pub fn first_unknown(state: &GameState, observer: PlayerId, target: PlayerId) -> Option<usize> {
    (0..state.hand(target).len()).find(|&slot| state.believed(observer, target, slot).is_none())
}
