//! Single-flight coordination of access-credential refreshes.
//!
//! The first request to fail authentication becomes the refresh leader and
//! holds a [`RefreshGuard`]. Every request that fails while the guard is alive
//! receives a [`PendingRefresh`] and waits. Settling the guard resolves all
//! waiters in the order they enqueued, with the same outcome.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::oneshot;

/// Why a refresh window ended without a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    #[error("token refresh failed: {0}")]
    Failed(String),
    #[error("token refresh was abandoned before it settled")]
    Abandoned,
}

pub type RefreshOutcome = Result<String, RefreshFailure>;

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    tx: oneshot::Sender<RefreshOutcome>,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_progress: bool,
    next_ticket: u64,
    waiters: VecDeque<Waiter>,
    /// Tickets in the order their outcome was sent.
    #[cfg(test)]
    delivered: Vec<u64>,
}

/// Owns the refresh-in-progress flag and the FIFO of waiting requests.
#[derive(Debug, Default)]
pub struct TokenRefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Result of [`TokenRefreshCoordinator::begin_refresh`].
#[derive(Debug)]
pub enum RefreshRole<'a> {
    /// No refresh was running; the caller must perform it and settle the guard.
    Leader(RefreshGuard<'a>),
    /// A refresh is already running; wait for its outcome.
    Waiter(PendingRefresh),
}

impl TokenRefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Atomically claim the refresh or join the one in flight.
    pub fn begin_refresh(&self) -> RefreshRole<'_> {
        let mut state = self.lock();
        if state.in_progress {
            return RefreshRole::Waiter(Self::push_waiter(&mut state));
        }
        state.in_progress = true;
        RefreshRole::Leader(RefreshGuard {
            coordinator: Some(self),
        })
    }

    /// Join the refresh in flight, if there is one.
    pub fn enqueue(&self) -> Option<PendingRefresh> {
        let mut state = self.lock();
        if !state.in_progress {
            return None;
        }
        Some(Self::push_waiter(&mut state))
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of requests waiting on the current refresh.
    pub fn pending(&self) -> usize {
        self.lock().waiters.len()
    }

    fn push_waiter(state: &mut RefreshState) -> PendingRefresh {
        let (tx, rx) = oneshot::channel();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.waiters.push_back(Waiter { ticket, tx });
        PendingRefresh { ticket, rx }
    }

    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };
        let count = waiters.len();
        #[cfg(test)]
        let mut delivered = Vec::with_capacity(count);
        for waiter in waiters {
            tracing::trace!(ticket = waiter.ticket, "Resuming queued request");
            // A dropped receiver means the caller went away; nothing to resolve.
            let _ = waiter.tx.send(outcome.clone());
            #[cfg(test)]
            delivered.push(waiter.ticket);
        }
        #[cfg(test)]
        self.lock().delivered.extend(delivered);
        count
    }
}

/// Held by the refresh leader. Dropping it unsettled rejects every waiter
/// with [`RefreshFailure::Abandoned`].
#[derive(Debug)]
pub struct RefreshGuard<'a> {
    coordinator: Option<&'a TokenRefreshCoordinator>,
}

impl RefreshGuard<'_> {
    /// End the refresh window. Returns how many waiters were resolved.
    pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
        match self.coordinator.take() {
            Some(coordinator) => coordinator.settle(outcome),
            None => 0,
        }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if let Some(coordinator) = self.coordinator.take() {
            let abandoned = coordinator.settle(Err(RefreshFailure::Abandoned));
            tracing::warn!(waiters = abandoned, "Token refresh abandoned");
        }
    }
}

/// A request parked until the in-flight refresh settles.
#[derive(Debug)]
pub struct PendingRefresh {
    ticket: u64,
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl PendingRefresh {
    /// Position in the coordinator's queue; increases with every enqueue.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub async fn wait(self) -> RefreshOutcome {
        self.rx.await.unwrap_or(Err(RefreshFailure::Abandoned))
    }
}
