//! Route guard and post-transition navigation selectors.
//!
//! These are pure reads of [`AuthState`]; rendering and history handling
//! belong to the caller.

use crate::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Profile,
}

impl Route {
    /// Protected routes need a logged-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home | Route::Profile)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

/// Decide what to show for `requested` given the current auth state.
pub fn guard(state: &AuthState, requested: Route) -> RouteDecision {
    match (requested.is_protected(), state.is_authenticated()) {
        (true, false) => RouteDecision::Redirect(Route::Login),
        (false, true) => RouteDecision::Redirect(Route::Home),
        _ => RouteDecision::Render(requested),
    }
}

/// Where to navigate after the state moved from `prev` to `next`, if anywhere.
///
/// A user appearing (login, or registration followed by auto-login) goes
/// home; a user disappearing goes back to the login screen.
pub fn navigation_after(prev: &AuthState, next: &AuthState) -> Option<Route> {
    match (prev.is_authenticated(), next.is_authenticated()) {
        (false, true) => Some(Route::Home),
        (true, false) => Some(Route::Login),
        _ => None,
    }
}
