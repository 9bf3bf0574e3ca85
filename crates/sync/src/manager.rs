// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline queue manager: sole mutator of the pending-action queue.
//!
//! Owns the in-memory mirror of the persisted queue and reconciles the two
//! after every call: each mutation appends/removes/bumps in memory, saves
//! the full list through the store, then publishes the new queue length on
//! a watch channel for the scheduler.
//!
//! Construct one manager at application start and share it by `Arc`; the
//! engine, the scheduler, and UI call sites all go through the same handle.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::watch;

use turf_core::{ActionId, ActionKind, Error, PendingAction, QueueStore, Result};

/// Read-only view of the queue at a point in time.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    /// The queued actions, in insertion order.
    pub actions: Vec<PendingAction>,
    /// Whether the initial load from the store has completed.
    ///
    /// Callers must not mutate the queue before this is set; doing so would
    /// risk overwriting a not-yet-loaded persisted state.
    pub loaded: bool,
}

impl QueueSnapshot {
    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

struct QueueState {
    actions: Vec<PendingAction>,
    loaded: bool,
}

/// Owner of the offline queue.
///
/// All components operate on the queue only through this manager; the
/// in-memory list and the persisted copy never diverge after a completed
/// save. A failed save is logged and the in-memory state stays
/// authoritative until the next successful persist.
pub struct OfflineQueueManager<S: QueueStore> {
    store: S,
    state: Mutex<QueueState>,
    len_tx: watch::Sender<usize>,
}

impl<S: QueueStore> OfflineQueueManager<S> {
    /// Creates an unloaded manager. Call [`load`](Self::load) before
    /// mutating the queue.
    pub fn new(store: S) -> Self {
        let (len_tx, _) = watch::channel(0);
        OfflineQueueManager {
            store,
            state: Mutex::new(QueueState {
                actions: Vec::new(),
                loaded: false,
            }),
            len_tx,
        }
    }

    /// Creates a manager and loads the persisted queue.
    pub fn open(store: S) -> Result<Self> {
        let manager = Self::new(store);
        manager.load()?;
        Ok(manager)
    }

    /// Loads the persisted queue into memory and marks the manager loaded.
    pub fn load(&self) -> Result<()> {
        let actions = self.store.load()?;
        let len = actions.len();

        let mut state = self.lock();
        state.actions = actions;
        state.loaded = true;
        drop(state);

        self.publish(len);
        Ok(())
    }

    /// Appends a freshly-created action and persists the queue.
    ///
    /// Returns the created record so the caller can render an optimistic
    /// placeholder carrying the action id.
    pub fn enqueue(&self, kind: ActionKind, payload: Value) -> Result<PendingAction> {
        let action = PendingAction::new(kind, payload);

        let mut state = self.lock();
        if !state.loaded {
            return Err(Error::QueueNotLoaded);
        }
        state.actions.push(action.clone());
        self.persist(&state);
        let len = state.actions.len();
        drop(state);

        self.publish(len);
        Ok(action)
    }

    /// Removes the action with the given id and persists the queue.
    ///
    /// Idempotent: removing an absent id is a no-op.
    pub fn dequeue(&self, id: ActionId) -> Result<()> {
        let mut state = self.lock();
        if !state.loaded {
            return Err(Error::QueueNotLoaded);
        }
        let before = state.actions.len();
        state.actions.retain(|a| a.id != id);
        if state.actions.len() == before {
            return Ok(());
        }
        self.persist(&state);
        let len = state.actions.len();
        drop(state);

        self.publish(len);
        Ok(())
    }

    /// Increments the retry count of the action with the given id and
    /// persists the queue. No-op if the id is absent.
    pub fn bump_retry(&self, id: ActionId) -> Result<()> {
        let mut state = self.lock();
        if !state.loaded {
            return Err(Error::QueueNotLoaded);
        }
        let Some(action) = state.actions.iter_mut().find(|a| a.id == id) else {
            return Ok(());
        };
        action.retry_count += 1;
        self.persist(&state);
        let len = state.actions.len();
        drop(state);

        // Length is unchanged, but publish keeps persist-then-publish one
        // step; the watch channel only wakes the scheduler on a change.
        self.publish(len);
        Ok(())
    }

    /// Returns the current in-memory queue and the loaded flag.
    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.lock();
        QueueSnapshot {
            actions: state.actions.clone(),
            loaded: state.loaded,
        }
    }

    /// Number of actions currently queued.
    pub fn pending_count(&self) -> usize {
        self.lock().actions.len()
    }

    /// Subscribes to queue-length changes.
    pub fn len_watch(&self) -> watch::Receiver<usize> {
        self.len_tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Saves the full list; on failure the in-memory state is kept
    /// authoritative and the error is only logged.
    fn persist(&self, state: &QueueState) {
        if let Err(e) = self.store.save(&state.actions) {
            tracing::warn!("failed to persist offline queue: {}", e);
        }
    }

    fn publish(&self, len: usize) {
        self.len_tx.send_if_modified(|current| {
            if *current == len {
                false
            } else {
                *current = len;
                true
            }
        });
    }
}
