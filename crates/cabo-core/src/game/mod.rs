pub mod action;
pub mod events;
pub mod match_state;
pub mod phase;
pub mod probe;
pub mod rules;
pub mod serialization;
pub mod state;
