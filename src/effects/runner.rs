//! Effect runner: the store middleware that talks to the auth service.
//!
//! - `LoginStart` starts the login lane and calls `AuthService::login`.
//! - `RegisterStart` starts the register lane and calls `AuthService::register`.
//! - `RegisterSuccess` dispatches `LoginStart` with the same credentials.
//!
//! Every started request that is not superseded ends in exactly one terminal
//! action. Capability errors never escape a task, and a call that panics
//! ends in the lane's failure action.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::auth::{AuthAction, AuthReducer, Credentials, ErrorInfo};
use crate::config::OrchestrationConfig;
use crate::service::{AuthService, CapabilityError};
use crate::store::{Middleware, Store};

use super::lane::{Lane, LaneOutcome, LanePhase, LaneSlot};

/// Errors that can occur when building the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Tasks are spawned on the runtime the runner was built in
    #[error("Effect runner requires a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

pub struct EffectRunner {
    service: Arc<dyn AuthService>,
    login: Arc<LaneSlot>,
    register: Arc<LaneSlot>,
    request_timeout: Option<Duration>,
    runtime: Handle,
}

impl EffectRunner {
    /// Build a runner that spawns on the current tokio runtime.
    pub fn new(
        service: Arc<dyn AuthService>,
        config: &OrchestrationConfig,
    ) -> Result<Self, RunnerError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(service, config, runtime))
    }

    pub fn with_handle(
        service: Arc<dyn AuthService>,
        config: &OrchestrationConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            service,
            login: Arc::new(LaneSlot::new(Lane::Login)),
            register: Arc::new(LaneSlot::new(Lane::Register)),
            request_timeout: config.request_timeout(),
            runtime,
        }
    }

    fn slot(&self, lane: Lane) -> &Arc<LaneSlot> {
        match lane {
            Lane::Login => &self.login,
            Lane::Register => &self.register,
        }
    }

    pub fn lane_phase(&self, lane: Lane) -> LanePhase {
        self.slot(lane).phase()
    }

    pub fn last_outcome(&self, lane: Lane) -> Option<LaneOutcome> {
        self.slot(lane).last_outcome()
    }

    pub fn superseded(&self, lane: Lane) -> u64 {
        self.slot(lane).superseded()
    }

    pub fn watch_phase(&self, lane: Lane) -> watch::Receiver<LanePhase> {
        self.slot(lane).watch_phase()
    }

    /// Cancel both lanes. Results of in-flight calls are discarded.
    pub fn shutdown(&self) {
        let login = self.login.cancel();
        let register = self.register.cancel();
        tracing::info!(
            login_cancelled = login,
            register_cancelled = register,
            "Effect runner stopped"
        );
    }

    fn start_login(&self, credentials: &Credentials, store: &Store<AuthReducer>) {
        let service = Arc::clone(&self.service);
        let email = credentials.email.clone();
        let password = credentials.password.clone();
        let limit = self.request_timeout;

        tracing::info!(lane = %Lane::Login, email = %email, "Starting login");

        self.spawn_lane(Lane::Login, store, async move {
            match with_timeout(limit, service.login(&email, password.expose())).await {
                Ok(user) => {
                    tracing::info!(email = %user.email, "Login succeeded");
                    (LaneOutcome::Succeeded, AuthAction::LoginSuccess { user })
                }
                Err(err) => {
                    tracing::warn!(kind = err.kind(), error = %err, "Login failed");
                    (LaneOutcome::Failed, failure(Lane::Login, ErrorInfo::from(err)))
                }
            }
        });
    }

    fn start_register(&self, credentials: &Credentials, store: &Store<AuthReducer>) {
        let service = Arc::clone(&self.service);
        let credentials = credentials.clone();
        let limit = self.request_timeout;

        tracing::info!(lane = %Lane::Register, email = %credentials.email, "Starting registration");

        self.spawn_lane(Lane::Register, store, async move {
            match with_timeout(limit, service.register(&credentials)).await {
                Ok(()) => {
                    tracing::info!(email = %credentials.email, "Registration succeeded");
                    (
                        LaneOutcome::Succeeded,
                        AuthAction::RegisterSuccess { credentials },
                    )
                }
                Err(err) => {
                    tracing::warn!(kind = err.kind(), error = %err, "Registration failed");
                    (LaneOutcome::Failed, failure(Lane::Register, ErrorInfo::from(err)))
                }
            }
        });
    }

    /// Supersede the lane's current request and run `call` in its place.
    ///
    /// The call runs in its own task so a panic surfaces as a `JoinError`.
    /// Only the call task is attached to the slot; aborting it ends the
    /// publisher too.
    fn spawn_lane<F>(&self, lane: Lane, store: &Store<AuthReducer>, call: F)
    where
        F: Future<Output = (LaneOutcome, AuthAction)> + Send + 'static,
    {
        let slot = Arc::clone(self.slot(lane));
        let ticket = slot.begin();
        let store = store.clone();
        let task_slot = Arc::clone(&slot);

        let call_task = self.runtime.spawn(call);
        let abort = call_task.abort_handle();

        self.runtime.spawn(async move {
            let (outcome, action) = match call_task.await {
                Ok(result) => result,
                Err(err) if err.is_cancelled() => return,
                Err(err) => {
                    tracing::error!(lane = %lane, error = %err, "Auth service call panicked");
                    (
                        LaneOutcome::Failed,
                        failure(lane, ErrorInfo::new(PANIC_MESSAGE)),
                    )
                }
            };
            task_slot.complete(ticket, outcome, || store.dispatch(action));
        });

        slot.attach(ticket, abort);
    }
}

impl Middleware<AuthReducer> for EffectRunner {
    fn on_action(&self, action: &AuthAction, store: &Store<AuthReducer>) {
        match action {
            AuthAction::LoginStart { credentials } => self.start_login(credentials, store),
            AuthAction::RegisterStart { credentials } => self.start_register(credentials, store),
            AuthAction::RegisterSuccess { credentials } => {
                tracing::info!(email = %credentials.email, "Logging in newly registered account");
                store.dispatch(AuthAction::LoginStart {
                    credentials: credentials.clone(),
                });
            }
            AuthAction::LoginSuccess { .. }
            | AuthAction::LoginFailure { .. }
            | AuthAction::RegisterFailure { .. }
            | AuthAction::LogOut => {}
        }
    }
}

/// Message carried by the failure action of a call that panicked.
pub const PANIC_MESSAGE: &str = "auth service panicked";

/// The terminal failure action for `lane`.
fn failure(lane: Lane, error: ErrorInfo) -> AuthAction {
    match lane {
        Lane::Login => AuthAction::LoginFailure { error },
        Lane::Register => AuthAction::RegisterFailure { error },
    }
}

/// Bound a capability call by `limit`, mapping expiry to `CapabilityError::Timeout`.
async fn with_timeout<T, F>(limit: Option<Duration>, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    match limit {
        None => call.await,
        Some(after) => match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(CapabilityError::Timeout { after }),
        },
    }
}
