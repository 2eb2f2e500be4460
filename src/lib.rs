//! Authentication state store with latest-wins async effects.
//!
//! ```text
//! LoginStart ──→ Store ──→ AuthReducer ──→ AuthState ──→ observers
//!                  │
//!                  └──→ EffectRunner ──→ AuthService ──→ LoginSuccess / LoginFailure
//! ```

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod effects;
pub mod logging;
pub mod mvi;
pub mod route;
pub mod service;
pub mod store;

pub use app::AuthApp;
