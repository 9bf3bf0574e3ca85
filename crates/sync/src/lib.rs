// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! turf-sync: offline queue manager and synchronization engine.
//!
//! Keeps a mobile client usable while disconnected and reconciles its
//! locally-created records with the backend once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  enqueue   ┌──────────────────┐  save   ┌────────────┐
//! │  UI layer  │───────────►│ OfflineQueue-    │────────►│ QueueStore │
//! │            │◄───────────│ Manager          │◄────────│  (JSONL)   │
//! └────────────┘  snapshot  └──────────────────┘  load   └────────────┘
//!                                    │ queue length (watch)
//!                                    ▼
//!                            ┌──────────────┐  run_sync ┌────────────┐
//!                            │ SyncScheduler│──────────►│ SyncEngine │
//!                            └──────────────┘ heartbeat └────────────┘
//!                                                          │ apply
//!                                                          ▼
//!                           ┌────────────────┐   ┌──────────────────┐
//!                           │ Connectivity-  │   │ RemoteMutation-  │
//!                           │ Probe (trait)  │   │ Client (trait)   │
//!                           └────────────────┘   └──────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - FIFO drain by creation time; a transient failure halts the pass so no
//!   younger action is ever applied before an older, still-retryable one
//! - Duplicate conflicts from the backend count as success (at-least-once
//!   enqueue stays idempotent)
//! - Bounded retry: actions that hit the retry cap are skipped, not
//!   blockers
//! - Single-flight: at most one sync pass runs at a time

mod engine;
mod manager;
mod overlay;
mod probe;
mod remote;
mod scheduler;
mod transport;

pub use engine::{SyncEngine, SyncPass, RETRY_CAP};
pub use manager::{OfflineQueueManager, QueueSnapshot};
pub use overlay::{overlay_pending, QueueRecord};
pub use probe::{ConnectivityProbe, Reachability, StaticProbe};
pub use remote::{
    Principal, RemoteConfig, RemoteError, RemoteMutationClient, RemoteResult, WebSocketRemote,
};
pub use scheduler::{SchedulerConfig, SyncScheduler};
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};

#[cfg(test)]
mod test_helpers;






#[cfg(test)]
mod scheduler_tests;
