//! Actions for the authentication flow.

use crate::effects::Lane;
use crate::mvi::Action;

use super::credentials::{Credentials, ErrorInfo, User};

/// Everything that can be dispatched to the auth store.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// User submitted the login form.
    LoginStart { credentials: Credentials },

    /// The login capability returned a user.
    LoginSuccess { user: User },

    /// The login capability failed.
    LoginFailure { error: ErrorInfo },

    /// User submitted the registration form.
    RegisterStart { credentials: Credentials },

    /// The register capability accepted the new account.
    ///
    /// Carries the submitted credentials so the account can be logged in.
    RegisterSuccess { credentials: Credentials },

    /// The register capability failed.
    RegisterFailure { error: ErrorInfo },

    /// User logged out.
    LogOut,
}

impl Action for AuthAction {
    fn name(&self) -> &'static str {
        match self {
            AuthAction::LoginStart { .. } => "LoginStart",
            AuthAction::LoginSuccess { .. } => "LoginSuccess",
            AuthAction::LoginFailure { .. } => "LoginFailure",
            AuthAction::RegisterStart { .. } => "RegisterStart",
            AuthAction::RegisterSuccess { .. } => "RegisterSuccess",
            AuthAction::RegisterFailure { .. } => "RegisterFailure",
            AuthAction::LogOut => "LogOut",
        }
    }
}

impl AuthAction {
    /// The orchestration lane this action starts or terminates, if any.
    pub fn lane(&self) -> Option<Lane> {
        match self {
            AuthAction::LoginStart { .. }
            | AuthAction::LoginSuccess { .. }
            | AuthAction::LoginFailure { .. } => Some(Lane::Login),
            AuthAction::RegisterStart { .. }
            | AuthAction::RegisterSuccess { .. }
            | AuthAction::RegisterFailure { .. } => Some(Lane::Register),
            AuthAction::LogOut => None,
        }
    }

    /// True for the success/failure conclusion of a lane.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuthAction::LoginSuccess { .. }
                | AuthAction::LoginFailure { .. }
                | AuthAction::RegisterSuccess { .. }
                | AuthAction::RegisterFailure { .. }
        )
    }
}
