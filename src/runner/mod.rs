pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{RunnerController, RunnerSnapshot};
pub use state::{Phase, RunnerState, TickOutcome};
