// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: drains the offline queue against the backend.
//!
//! A pass applies queued actions strictly in creation order and stops at
//! the first transient failure, so an action is never applied before an
//! earlier, still-pending one. Later actions may reference records created
//! by earlier ones (a lead referencing its area), which is why ordering
//! wins over throughput here.
//!
//! Actions whose retry count has reached [`RETRY_CAP`] are stalled: they
//! are skipped, left in the queue, and do not block the rest of the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use turf_core::{PendingAction, QueueStore};

use crate::manager::OfflineQueueManager;
use crate::probe::ConnectivityProbe;
use crate::remote::RemoteMutationClient;

/// Retry cap: an action that has failed this many times is stalled and
/// skipped by subsequent passes. Stalled actions stay queued; they are
/// never evicted.
pub const RETRY_CAP: u32 = 5;

/// Outcome of one [`SyncEngine::run_sync`] invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPass {
    /// Another pass is in progress; this call was a no-op.
    AlreadyRunning,
    /// The queue has not finished its initial load; nothing was attempted.
    NotLoaded,
    /// The queue was empty.
    Empty,
    /// The connectivity probe reported unreachable. Not an error; the
    /// queue is untouched.
    Offline,
    /// The pass ran.
    Completed {
        /// Actions confirmed (applied remotely or already existing).
        applied: usize,
        /// Whether the pass stopped early on a transient failure.
        halted: bool,
    },
}

/// Drains the offline queue while preserving causal order and idempotency.
pub struct SyncEngine<S, P, R>
where
    S: QueueStore,
    P: ConnectivityProbe,
    R: RemoteMutationClient,
{
    queue: Arc<OfflineQueueManager<S>>,
    probe: P,
    remote: R,
    /// Single-flight guard: at most one pass runs at a time.
    in_flight: AtomicBool,
}

impl<S, P, R> SyncEngine<S, P, R>
where
    S: QueueStore,
    P: ConnectivityProbe,
    R: RemoteMutationClient,
{
    /// Creates an engine draining `queue` through `remote`, gated on
    /// `probe`.
    pub fn new(queue: Arc<OfflineQueueManager<S>>, probe: P, remote: R) -> Self {
        SyncEngine {
            queue,
            probe,
            remote,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The queue manager this engine drains.
    pub fn queue(&self) -> &Arc<OfflineQueueManager<S>> {
        &self.queue
    }

    /// Runs one sync pass over the current queue snapshot.
    ///
    /// Returns immediately if a pass is already in progress, the queue is
    /// empty or not yet loaded, or the probe reports unreachable.
    pub async fn run_sync(&self) -> SyncPass {
        let snapshot = self.queue.snapshot();
        if !snapshot.loaded {
            return SyncPass::NotLoaded;
        }
        if snapshot.is_empty() {
            return SyncPass::Empty;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SyncPass::AlreadyRunning;
        }

        let pass = self.drain(snapshot.actions).await;
        self.in_flight.store(false, Ordering::SeqCst);
        pass
    }

    async fn drain(&self, mut actions: Vec<PendingAction>) -> SyncPass {
        if !self.probe.reachability().await.is_online() {
            return SyncPass::Offline;
        }

        // Insertion order is not trusted; sync strictly by creation time.
        actions.sort_by_key(PendingAction::sort_key);

        let mut applied = 0;
        for action in &actions {
            if action.retry_count >= RETRY_CAP {
                tracing::debug!(id = %action.id, "skipping stalled action");
                continue;
            }
            if self.process_action(action).await {
                applied += 1;
            } else {
                return SyncPass::Completed {
                    applied,
                    halted: true,
                };
            }
        }

        SyncPass::Completed {
            applied,
            halted: false,
        }
    }

    /// Applies one action; returns whether the pass may continue.
    async fn process_action(&self, action: &PendingAction) -> bool {
        match self.remote.apply(action).await {
            Ok(()) => {
                let _ = self.queue.dequeue(action.id);
                true
            }
            Err(e) if e.is_duplicate() => {
                // The mutation's effect already exists server-side; the
                // action is done, not failed.
                tracing::debug!(id = %action.id, "mutation already applied remotely");
                let _ = self.queue.dequeue(action.id);
                true
            }
            Err(e) => {
                tracing::warn!(id = %action.id, kind = %action.kind, "remote apply failed: {}", e);
                let _ = self.queue.bump_retry(action.id);
                false
            }
        }
    }
}
