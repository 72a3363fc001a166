pub mod bot;
pub mod controller;
pub mod pacing;
pub mod policy;

pub use bot::{AbilityPlan, BotAction, BotParams, TurnPlanner, TurnReport};
pub use controller::GameController;
pub use pacing::{NoopPacer, Pacer, PacingConfig, ThreadSleepPacer};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
