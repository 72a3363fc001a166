pub mod estimator;
pub mod game;
pub mod model;
