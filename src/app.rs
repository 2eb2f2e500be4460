//! Root composition: one store, one reducer, one effect runner.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::auth::{AuthAction, AuthReducer, AuthState, Credentials};
use crate::config::OrchestrationConfig;
use crate::effects::{EffectRunner, Lane, LaneOutcome, LanePhase, RunnerError};
use crate::service::AuthService;
use crate::store::Store;

/// The auth store wired to its effect runner.
///
/// Cheap to clone; clones share the store and the runner.
#[derive(Clone)]
pub struct AuthApp {
    store: Store<AuthReducer>,
    runner: Arc<EffectRunner>,
}

impl AuthApp {
    /// Build the app on the current tokio runtime.
    pub fn new(
        service: Arc<dyn AuthService>,
        config: &OrchestrationConfig,
    ) -> Result<Self, RunnerError> {
        let runner = Arc::new(EffectRunner::new(service, config)?);
        let store = Store::new(AuthState::default()).with_middleware(runner.clone());
        Ok(Self { store, runner })
    }

    pub fn store(&self) -> &Store<AuthReducer> {
        &self.store
    }

    pub fn dispatch(&self, action: AuthAction) {
        self.store.dispatch(action);
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) {
        self.dispatch(AuthAction::LoginStart {
            credentials: Credentials::login(email, password),
        });
    }

    pub fn register(&self, credentials: Credentials) {
        self.dispatch(AuthAction::RegisterStart { credentials });
    }

    pub fn log_out(&self) {
        self.dispatch(AuthAction::LogOut);
    }

    pub fn state(&self) -> AuthState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.store.subscribe()
    }

    pub async fn wait_until<F>(&self, predicate: F, timeout: Duration) -> Option<AuthState>
    where
        F: FnMut(&AuthState) -> bool,
    {
        self.store.wait_until(predicate, timeout).await
    }

    pub fn lane_phase(&self, lane: Lane) -> LanePhase {
        self.runner.lane_phase(lane)
    }

    pub fn last_outcome(&self, lane: Lane) -> Option<LaneOutcome> {
        self.runner.last_outcome(lane)
    }

    /// Wait until `lane` has no request in flight.
    ///
    /// Returns false if the lane is still pending when `timeout` elapses.
    pub async fn settle(&self, lane: Lane, timeout: Duration) -> bool {
        let mut rx = self.runner.watch_phase(lane);
        let settled = matches!(
            tokio::time::timeout(timeout, rx.wait_for(|phase| *phase == LanePhase::Idle)).await,
            Ok(Ok(_))
        );
        settled
    }

    /// Stop all lanes. Later results are discarded.
    pub fn shutdown(&self) {
        self.runner.shutdown();
    }
}
