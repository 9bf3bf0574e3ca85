// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the sync scheduler.
//!
//! These run under paused tokio time; the heartbeat is advanced
//! explicitly, so no test waits on the wall clock.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use turf_core::{ActionKind, MemoryQueueStore, PendingAction};

use super::engine::SyncEngine;
use super::manager::OfflineQueueManager;
use super::probe::StaticProbe;
use super::scheduler::{SchedulerConfig, SyncScheduler};
use super::test_helpers::{make_area, Outcome, ScriptedRemote};

type TestEngine = SyncEngine<MemoryQueueStore, StaticProbe, ScriptedRemote>;

fn make_engine(actions: Vec<PendingAction>, remote: ScriptedRemote) -> Arc<TestEngine> {
    let store = MemoryQueueStore::with_actions(actions);
    let queue = Arc::new(OfflineQueueManager::open(store).unwrap());
    Arc::new(SyncEngine::new(queue, StaticProbe::online(), remote))
}

/// Let spawned tasks run and any due timers fire.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_startup_heartbeat_drains_persisted_queue() {
    let action = make_area(1000);
    let remote = ScriptedRemote::new();
    let engine = make_engine(vec![action.clone()], remote.clone());

    let scheduler = SyncScheduler::spawn(Arc::clone(&engine), SchedulerConfig::default());
    settle().await;

    // The first heartbeat tick fires immediately.
    assert_eq!(remote.attempts(), vec![action.id]);
    assert_eq!(engine.queue().pending_count(), 0);

    scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_enqueue_triggers_a_pass() {
    let remote = ScriptedRemote::new();
    let engine = make_engine(Vec::new(), remote.clone());

    // Heartbeat far away: only the length trigger can explain a pass.
    let config = SchedulerConfig {
        heartbeat: Duration::from_secs(3600),
    };
    let scheduler = SyncScheduler::spawn(Arc::clone(&engine), config);
    settle().await;
    assert!(remote.attempts().is_empty());

    let action = engine
        .queue()
        .enqueue(ActionKind::AddArea, json!({"name": "North End"}))
        .unwrap();
    settle().await;

    assert_eq!(remote.attempts(), vec![action.id]);
    assert_eq!(engine.queue().pending_count(), 0);

    scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_retries_failed_actions() {
    let action = make_area(1000);
    let remote = ScriptedRemote::new();
    remote.set_outcome(action.id, Outcome::Fail);
    let engine = make_engine(vec![action.clone()], remote.clone());

    let scheduler = SyncScheduler::spawn(Arc::clone(&engine), SchedulerConfig::default());
    settle().await;

    // Startup pass failed; the retry bump must not re-trigger a pass by
    // itself (the length did not change).
    assert_eq!(remote.attempts().len(), 1);
    assert_eq!(engine.queue().snapshot().actions[0].retry_count, 1);

    // The next heartbeat picks it up again.
    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(remote.attempts().len(), 2);
    assert_eq!(engine.queue().snapshot().actions[0].retry_count, 2);

    scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_the_heartbeat() {
    let action = make_area(1000);
    let remote = ScriptedRemote::new();
    remote.set_outcome(action.id, Outcome::Fail);
    let engine = make_engine(vec![action], remote.clone());

    let scheduler = SyncScheduler::spawn(engine, SchedulerConfig::default());
    settle().await;
    assert_eq!(remote.attempts().len(), 1);

    scheduler.shutdown().await;

    // No further heartbeats fire after shutdown.
    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;
    assert_eq!(remote.attempts().len(), 1);
}
