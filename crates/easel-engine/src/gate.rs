//! Serialization primitives: the FIFO ticket gate and the in-flight registry
//!
//! Two layers of mutual exclusion protect the board, and they answer
//! different questions:
//! - [`TicketGate`]: "is it my turn to mutate layout?" Every layout-mutating
//!   operation queues here and runs alone, in arrival order. Discovery and
//!   placement inside the critical section therefore see a board no sibling
//!   operation is concurrently rearranging.
//! - [`InFlight`]: "is this exact project already being synced?" A duplicate
//!   request must not queue behind the first one; it answers immediately
//!   from memory instead.
//!
//! Both hand out RAII guards. Release happens on drop, which covers early
//! returns and error paths without any release bookkeeping at call sites.

use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;
use tokio::sync::Notify;

use crate::project::ProjectId;

/// Async FIFO lock with explicit tickets
///
/// `acquire` draws a monotonically increasing ticket; the holder of the
/// currently-served ticket proceeds, everyone else parks on a [`Notify`].
/// Dropping the returned [`GatePass`] advances service to the next ticket.
/// Tickets make the ordering auditable: there is no fairness guesswork, the
/// counter IS the queue.
#[derive(Debug, Default)]
pub struct TicketGate {
    next: AtomicU64,
    serving: AtomicU64,
    notify: Notify,
}

impl TicketGate {
    /// Gate with no queued tickets
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a ticket and wait until it is served
    pub async fn acquire(&self) -> GatePass<'_> {
        let ticket = self.next.fetch_add(1, Ordering::SeqCst);
        loop {
            // register interest before checking, so a release between the
            // check and the await cannot be missed
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();
            if self.serving.load(Ordering::SeqCst) == ticket {
                return GatePass { gate: self };
            }
            notified.await;
        }
    }

    /// Tickets drawn but not yet released, including the one being served
    #[inline]
    #[must_use]
    pub fn depth(&self) -> u64 {
        self.next.load(Ordering::SeqCst) - self.serving.load(Ordering::SeqCst)
    }
}

/// Exclusive access token; dropping it serves the next ticket
#[must_use = "the gate is held until the pass is dropped"]
#[derive(Debug)]
pub struct GatePass<'a> {
    gate: &'a TicketGate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        self.gate.serving.fetch_add(1, Ordering::SeqCst);
        self.gate.notify.notify_waiters();
    }
}

/// Set of projects with a sync currently running
#[derive(Debug, Default)]
pub struct InFlight {
    active: DashSet<ProjectId>,
}

impl InFlight {
    /// Empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a project; `None` when a sync already holds it
    #[must_use]
    pub fn begin(&self, id: &ProjectId) -> Option<InFlightGuard<'_>> {
        if self.active.insert(id.clone()) {
            Some(InFlightGuard {
                registry: self,
                id: id.clone(),
            })
        } else {
            None
        }
    }

    /// Whether a sync for this project is running right now
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &ProjectId) -> bool {
        self.active.contains(id)
    }
}

/// Claim on a project's sync slot, released on drop
#[must_use = "the slot is held until the guard is dropped"]
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    id: ProjectId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.active.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio_test::{assert_pending, assert_ready};

    #[tokio::test]
    async fn pass_release_unblocks_the_next_acquire() {
        let gate = TicketGate::new();
        let pass = gate.acquire().await;
        assert_eq!(gate.depth(), 1);
        drop(pass);

        let reacquired = tokio::time::timeout(Duration::from_secs(1), gate.acquire()).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn parked_acquire_is_pending_until_the_pass_drops() {
        let gate = TicketGate::new();
        let pass = gate.acquire().await;

        let mut waiter = tokio_test::task::spawn(gate.acquire());
        assert_pending!(waiter.poll());
        assert_pending!(waiter.poll());

        drop(pass);
        assert!(waiter.is_woken());
        let _pass = assert_ready!(waiter.poll());
        assert_eq!(gate.depth(), 1);
    }

    #[tokio::test]
    async fn waiters_are_served_in_ticket_order() {
        let gate = Arc::new(TicketGate::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let blocker = gate.acquire().await;

        let mut handles = Vec::new();
        for i in 0..4 {
            let gate = Arc::clone(&gate);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _pass = gate.acquire().await;
                order.lock().push(i);
            }));
            // let the task park on its ticket before spawning the next
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        }

        assert_eq!(gate.depth(), 5);
        drop(blocker);
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn depth_returns_to_zero_when_idle() {
        let gate = TicketGate::new();
        {
            let _pass = gate.acquire().await;
        }
        {
            let _pass = gate.acquire().await;
        }
        assert_eq!(gate.depth(), 0);
    }

    #[tokio::test]
    async fn duplicate_claim_is_rejected_until_release() {
        let registry = InFlight::new();
        let id = ProjectId::new("p1");

        let guard = registry.begin(&id).expect("first claim");
        assert!(registry.contains(&id));
        assert!(registry.begin(&id).is_none());

        drop(guard);
        assert!(!registry.contains(&id));
        assert!(registry.begin(&id).is_some());
    }

    #[tokio::test]
    async fn claims_are_per_project() {
        let registry = InFlight::new();
        let _a = registry.begin(&ProjectId::new("a")).expect("claim a");
        let _b = registry.begin(&ProjectId::new("b")).expect("claim b");
        assert!(registry.contains(&ProjectId::new("a")));
        assert!(registry.contains(&ProjectId::new("b")));
    }
}
