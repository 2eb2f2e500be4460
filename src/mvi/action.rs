//! Base trait for actions.

/// Marker trait for action objects.
///
/// Actions represent:
/// - Intents (a user asked to log in)
/// - Outcomes (the auth service answered)
///
/// Actions are folded into state by reducers and observed by middleware.
pub trait Action: Send + Sync + 'static {
    /// Stable tag name, used for logging without exposing payloads.
    fn name(&self) -> &'static str;
}
