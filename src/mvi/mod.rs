//! Unidirectional data-flow primitives.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Observers
//!    ↑           │
//!    │           └──→ Middleware (effects)
//!    └──────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of application state
//! - **Action**: Intents and outcomes, tagged by kind
//! - **Reducer**: Pure function that folds an action into a new state

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::State;
