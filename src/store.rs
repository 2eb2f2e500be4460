//! Single-writer state container with middleware.
//!
//! The store owns the only copy of the state. Every mutation goes through
//! [`Store::dispatch`], which applies the reducer atomically and then hands
//! the action to middleware. Middleware never runs under the state lock, so
//! it may dispatch follow-up actions.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::mvi::{Action, Reducer};

/// Observes dispatched actions after they have been reduced.
///
/// This is where side effects live: the reducer stays pure and middleware
/// reacts to actions by starting work that eventually dispatches more.
pub trait Middleware<R: Reducer>: Send + Sync {
    fn on_action(&self, action: &R::Action, store: &Store<R>);
}

/// Clonable handle to a store. All clones share the same state.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Reducer> {
    state: watch::Sender<R::State>,
    middleware: RwLock<Vec<Arc<dyn Middleware<R>>>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(StoreInner {
                state,
                middleware: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register middleware. Middleware sees actions in registration order.
    pub fn add_middleware(&self, middleware: Arc<dyn Middleware<R>>) {
        self.inner.middleware.write().push(middleware);
    }

    /// Builder form of [`Store::add_middleware`].
    pub fn with_middleware(self, middleware: Arc<dyn Middleware<R>>) -> Self {
        self.add_middleware(middleware);
        self
    }

    /// Apply `action` to the state, then run middleware.
    ///
    /// Observers are only notified when the reduced state differs from the
    /// previous one.
    pub fn dispatch(&self, action: R::Action) {
        let changed = self.inner.state.send_if_modified(|state| {
            let next = R::reduce(state.clone(), &action);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });

        tracing::debug!(action = action.name(), changed, "Dispatched action");

        let middleware = self.inner.middleware.read().clone();
        for m in &middleware {
            m.on_action(&action, self);
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.inner.state.subscribe()
    }

    /// Wait until the state satisfies `predicate`.
    ///
    /// Returns the matching state, or `None` if `timeout` elapses first.
    pub async fn wait_until<F>(&self, predicate: F, timeout: Duration) -> Option<R::State>
    where
        F: FnMut(&R::State) -> bool,
    {
        let mut rx = self.subscribe();
        let state = match tokio::time::timeout(timeout, rx.wait_for(predicate)).await {
            Ok(Ok(state)) => Some(state.clone()),
            // Sender lives as long as the store, so only the timeout can fire
            Ok(Err(_)) | Err(_) => None,
        };
        state
    }
}
