//! Side effects driven by dispatched actions.
//!
//! - `lane.rs` - Latest-wins request slots
//! - `runner.rs` - Middleware that calls the auth service

mod lane;
mod runner;

pub use lane::{Lane, LaneOutcome, LanePhase, LaneSlot, LaneTicket};
pub use runner::{EffectRunner, RunnerError, PANIC_MESSAGE};
