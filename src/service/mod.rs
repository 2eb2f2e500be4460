//! The external auth capability consumed by the effect runner.

mod error;
mod http;

pub use error::CapabilityError;
pub use http::HttpAuthService;

use async_trait::async_trait;

use crate::auth::{Credentials, User};

/// Login and registration calls against an authentication backend.
///
/// Implementations must be cheap to share across tasks; the effect runner
/// holds one behind an `Arc` and calls it from spawned tasks.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate and return the user, including its session token.
    async fn login(&self, email: &str, password: &str) -> Result<User, CapabilityError>;

    /// Create a new account. Success carries no payload.
    async fn register(&self, credentials: &Credentials) -> Result<(), CapabilityError>;
}
