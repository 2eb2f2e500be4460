use crate::mvi::State;

use super::credentials::{ErrorInfo, User};

/// Authentication state held by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    /// Set only by `LoginSuccess`, cleared only by `LogOut`.
    pub current_user: Option<User>,
    /// Last failure reported by a lane.
    pub error: Option<ErrorInfo>,
    pub register_success: bool,
}

impl State for AuthState {}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}
