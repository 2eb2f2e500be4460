//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use authflow::auth::{AuthAction, AuthReducer, AuthState, Credentials, User};
use authflow::config::OrchestrationConfig;
use authflow::effects::{EffectRunner, Lane};
use authflow::mvi::Action;
use authflow::service::{AuthService, CapabilityError};
use authflow::store::{Middleware, Store};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// -- Scripted service ---------------------------------------------------------

/// One canned answer, returned after `delay`.
pub struct Scripted<T> {
    result: Result<T, (u16, String)>,
    delay: Duration,
}

impl<T> Scripted<T> {
    pub fn after(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

pub fn ok<T>(value: T) -> Scripted<T> {
    Scripted {
        result: Ok(value),
        delay: Duration::ZERO,
    }
}

pub fn rejected<T>(status: u16, message: &str) -> Scripted<T> {
    Scripted {
        result: Err((status, message.to_string())),
        delay: Duration::ZERO,
    }
}

/// In-memory `AuthService` answering from per-call queues and recording calls.
#[derive(Default)]
pub struct ScriptedService {
    login_replies: Mutex<VecDeque<Scripted<User>>>,
    register_replies: Mutex<VecDeque<Scripted<()>>>,
    login_calls: Mutex<Vec<(String, String)>>,
    register_calls: Mutex<Vec<Credentials>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_login(&self, reply: Scripted<User>) {
        self.login_replies.lock().push_back(reply);
    }

    pub fn on_register(&self, reply: Scripted<()>) {
        self.register_replies.lock().push_back(reply);
    }

    pub fn login_calls(&self) -> Vec<(String, String)> {
        self.login_calls.lock().clone()
    }

    pub fn register_calls(&self) -> Vec<Credentials> {
        self.register_calls.lock().clone()
    }
}

async fn answer<T>(reply: Option<Scripted<T>>) -> Result<T, CapabilityError> {
    let Some(reply) = reply else {
        return Err(CapabilityError::Rejected {
            status: 500,
            message: "no scripted reply".to_string(),
        });
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    reply
        .result
        .map_err(|(status, message)| CapabilityError::Rejected { status, message })
}

#[async_trait]
impl AuthService for ScriptedService {
    async fn login(&self, email: &str, password: &str) -> Result<User, CapabilityError> {
        self.login_calls
            .lock()
            .push((email.to_string(), password.to_string()));
        let reply = self.login_replies.lock().pop_front();
        answer(reply).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), CapabilityError> {
        self.register_calls.lock().push(credentials.clone());
        let reply = self.register_replies.lock().pop_front();
        answer(reply).await
    }
}

/// `AuthService` whose calls panic, counting how often it was invoked.
#[derive(Default)]
pub struct PanickingService {
    calls: Mutex<usize>,
}

impl PanickingService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl AuthService for PanickingService {
    async fn login(&self, _email: &str, _password: &str) -> Result<User, CapabilityError> {
        *self.calls.lock() += 1;
        explode("login")
    }

    async fn register(&self, _credentials: &Credentials) -> Result<(), CapabilityError> {
        *self.calls.lock() += 1;
        explode("register")
    }
}

fn explode<T>(call: &str) -> Result<T, CapabilityError> {
    panic!("{} backend exploded", call)
}

// -- Action log ---------------------------------------------------------------

/// Middleware that records every dispatched action.
#[derive(Default)]
pub struct ActionLog(Mutex<Vec<AuthAction>>);

impl ActionLog {
    pub fn actions(&self) -> Vec<AuthAction> {
        self.0.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.lock().iter().map(|a| a.name()).collect()
    }

    /// Terminal actions observed for `lane`, in dispatch order.
    pub fn terminals(&self, lane: Lane) -> Vec<AuthAction> {
        self.0
            .lock()
            .iter()
            .filter(|a| a.is_terminal() && a.lane() == Some(lane))
            .cloned()
            .collect()
    }
}

impl Middleware<AuthReducer> for ActionLog {
    fn on_action(&self, action: &AuthAction, _store: &Store<AuthReducer>) {
        self.0.lock().push(action.clone());
    }
}

// -- Wiring -------------------------------------------------------------------

pub struct Wired {
    pub store: Store<AuthReducer>,
    pub runner: Arc<EffectRunner>,
    pub log: Arc<ActionLog>,
}

/// Store with the action log installed ahead of the effect runner.
///
/// Must be called from inside a tokio runtime.
pub fn wire(service: Arc<dyn AuthService>, config: &OrchestrationConfig) -> Wired {
    let runner = Arc::new(EffectRunner::new(service, config).expect("tokio runtime"));
    let log = Arc::new(ActionLog::default());
    let store = Store::new(AuthState::default())
        .with_middleware(log.clone())
        .with_middleware(runner.clone());
    Wired { store, runner, log }
}

pub fn user(token: &str, email: &str) -> User {
    User::new(token, email)
}

/// Wait for in-flight lanes to publish (or be discarded).
pub async fn quiesce(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
