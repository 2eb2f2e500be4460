//! Authentication feature module.
//!
//! # Architecture
//!
//! - `action.rs` - Tagged actions (intents and outcomes)
//! - `credentials.rs` - Payloads: credentials, user, error info
//! - `state.rs` - Auth state snapshot
//! - `reducer.rs` - State transitions

mod action;
mod credentials;
mod reducer;
mod state;

pub use action::AuthAction;
pub use credentials::{Credentials, ErrorInfo, Secret, User};
pub use reducer::AuthReducer;
pub use state::AuthState;
