//! Reducer for authentication state.

use crate::mvi::Reducer;

use super::action::AuthAction;
use super::state::AuthState;

/// Reducer for auth state transitions.
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;

    fn reduce(state: Self::State, action: &Self::Action) -> Self::State {
        match action {
            AuthAction::LoginSuccess { user } => AuthState {
                current_user: Some(user.clone()),
                error: None,
                ..state
            },

            AuthAction::LoginFailure { error } | AuthAction::RegisterFailure { error } => {
                // Overwrites any earlier error
                AuthState {
                    error: Some(error.clone()),
                    ..state
                }
            }

            AuthAction::RegisterSuccess { .. } => AuthState {
                register_success: true,
                ..state
            },

            AuthAction::LogOut => AuthState::default(),

            // Start actions are handled by the effect runner
            AuthAction::LoginStart { .. } | AuthAction::RegisterStart { .. } => state,
        }
    }
}
