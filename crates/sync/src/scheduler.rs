// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync scheduler: decides when the engine runs.
//!
//! Two triggers, both cheap no-ops when there is nothing to do:
//! - a queue-length change where the queue is non-empty (an enqueue while
//!   online drains immediately)
//! - a fixed heartbeat, which also bounds how long a queue waits after
//!   connectivity returns: there is no connectivity-regained event, so the
//!   worst case is one heartbeat interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use turf_core::QueueStore;

use crate::engine::SyncEngine;
use crate::probe::ConnectivityProbe;
use crate::remote::RemoteMutationClient;

/// Configuration for the sync scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Heartbeat period between unconditional sync passes.
    pub heartbeat: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            heartbeat: Duration::from_secs(30),
        }
    }
}

/// Handle to the background scheduling task.
pub struct SyncScheduler {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl SyncScheduler {
    /// Spawns the scheduling task for the given engine.
    ///
    /// The first heartbeat tick fires immediately, so a queue persisted by
    /// a previous process starts draining at startup without waiting a full
    /// interval.
    pub fn spawn<S, P, R>(engine: Arc<SyncEngine<S, P, R>>, config: SchedulerConfig) -> Self
    where
        S: QueueStore + 'static,
        P: ConnectivityProbe + 'static,
        R: RemoteMutationClient + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut len_rx = engine.queue().len_watch();

        let handle = tokio::spawn(async move {
            let mut heartbeat = tokio::time::interval(config.heartbeat);
            heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = heartbeat.tick() => {
                        engine.run_sync().await;
                    }
                    changed = len_rx.changed() => {
                        if changed.is_err() {
                            // Manager dropped; nothing left to schedule.
                            break;
                        }
                        let len = *len_rx.borrow_and_update();
                        if len > 0 {
                            engine.run_sync().await;
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        break;
                    }
                }
            }
        });

        SyncScheduler {
            handle,
            shutdown_tx,
        }
    }

    /// Stops the scheduling task and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}
