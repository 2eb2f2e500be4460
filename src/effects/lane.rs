//! Latest-wins request lanes.
//!
//! A lane runs at most one observable request at a time. Starting a new
//! request bumps the lane's generation and aborts the previous task; a task
//! may only publish its result while its ticket still matches the current
//! generation. The check and the publish happen under the slot lock, so a
//! concurrent `begin` can never slip in between them.
//!
//! The phase is also published on a watch channel for async waiters. It only
//! flips to `Idle` after the terminal publish has returned, so a waiter that
//! wakes on `Idle` already sees any follow-up request the publish started.

use std::cell::RefCell;
use std::fmt;

use parking_lot::ReentrantMutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Independent orchestration flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Login,
    Register,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Login => "login",
            Lane::Register => "register",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a lane currently has a request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePhase {
    Idle,
    Pending,
}

/// How the most recent published request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneOutcome {
    Succeeded,
    Failed,
}

/// Proof of which request a task is running for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneTicket {
    lane: Lane,
    generation: u64,
}

impl LaneTicket {
    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-lane bookkeeping shared between the runner and its tasks.
///
/// The mutex is reentrant so a terminal dispatch may start a new request on
/// the same lane from within `complete`.
pub struct LaneSlot {
    lane: Lane,
    inner: ReentrantMutex<RefCell<SlotInner>>,
    phase_tx: watch::Sender<LanePhase>,
}

#[derive(Default)]
struct SlotInner {
    generation: u64,
    pending: bool,
    task: Option<AbortHandle>,
    last_outcome: Option<LaneOutcome>,
    superseded: u64,
}

impl LaneSlot {
    pub fn new(lane: Lane) -> Self {
        let (phase_tx, _) = watch::channel(LanePhase::Idle);
        Self {
            lane,
            inner: ReentrantMutex::new(RefCell::new(SlotInner::default())),
            phase_tx,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Start a new request, superseding whatever is in flight.
    pub fn begin(&self) -> LaneTicket {
        let guard = self.inner.lock();
        let mut inner = guard.borrow_mut();

        inner.generation += 1;
        if inner.pending {
            inner.superseded += 1;
            tracing::info!(
                lane = %self.lane,
                generation = inner.generation,
                "Superseding pending request"
            );
        }
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.pending = true;
        self.publish_phase(LanePhase::Pending);

        LaneTicket {
            lane: self.lane,
            generation: inner.generation,
        }
    }

    /// Record the task running for `ticket` so a later `begin` can abort it.
    ///
    /// A task that is already stale (or already finished) is not recorded.
    pub fn attach(&self, ticket: LaneTicket, task: AbortHandle) {
        let guard = self.inner.lock();
        let mut inner = guard.borrow_mut();

        if inner.generation == ticket.generation && inner.pending {
            inner.task = Some(task);
        } else if inner.generation != ticket.generation {
            task.abort();
        }
    }

    /// Publish the result of the request identified by `ticket`.
    ///
    /// `publish` runs only if the ticket is still current; returns whether it
    /// ran. Stale results are dropped silently.
    pub fn complete<F>(&self, ticket: LaneTicket, outcome: LaneOutcome, publish: F) -> bool
    where
        F: FnOnce(),
    {
        let guard = self.inner.lock();
        {
            let mut inner = guard.borrow_mut();
            if inner.generation != ticket.generation || !inner.pending {
                tracing::debug!(
                    lane = %self.lane,
                    generation = ticket.generation,
                    current = inner.generation,
                    "Discarding stale result"
                );
                return false;
            }
            inner.pending = false;
            inner.task = None;
            inner.last_outcome = Some(outcome);
        }

        // Still holding the slot lock: no other thread can begin in between.
        publish();

        // publish may have begun a new request on this lane
        if !guard.borrow().pending {
            self.publish_phase(LanePhase::Idle);
        }
        true
    }

    /// Invalidate any in-flight request without starting a new one.
    ///
    /// Returns true if a request was pending.
    pub fn cancel(&self) -> bool {
        let guard = self.inner.lock();
        let mut inner = guard.borrow_mut();

        let was_pending = inner.pending;
        inner.generation += 1;
        inner.pending = false;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        self.publish_phase(LanePhase::Idle);
        if was_pending {
            tracing::info!(lane = %self.lane, "Cancelled pending request");
        }
        was_pending
    }

    pub fn phase(&self) -> LanePhase {
        let guard = self.inner.lock();
        let inner = guard.borrow();
        if inner.pending {
            LanePhase::Pending
        } else {
            LanePhase::Idle
        }
    }

    /// Receiver that follows the lane's phase.
    pub fn watch_phase(&self) -> watch::Receiver<LanePhase> {
        self.phase_tx.subscribe()
    }

    fn publish_phase(&self, phase: LanePhase) {
        self.phase_tx.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            *current = phase;
            true
        });
    }

    pub fn last_outcome(&self) -> Option<LaneOutcome> {
        self.inner.lock().borrow().last_outcome
    }

    /// Number of requests that were replaced while still pending.
    pub fn superseded(&self) -> u64 {
        self.inner.lock().borrow().superseded
    }
}
