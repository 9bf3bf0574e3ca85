// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations for the turf CLI.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use turf_core::{FileQueueStore, PendingAction};
use turf_sync::{
    OfflineQueueManager, Principal, RemoteConfig, StaticProbe, SyncEngine, SyncPass,
    WebSocketRemote, RETRY_CAP,
};

type CliResult = Result<(), Box<dyn Error>>;

/// List queued actions, oldest first.
pub fn pending(queue_path: &Path) -> CliResult {
    let manager = open_queue(queue_path)?;
    let mut actions = manager.snapshot().actions;
    actions.sort_by_key(PendingAction::sort_key);

    if actions.is_empty() {
        println!("queue is empty");
        return Ok(());
    }

    for action in &actions {
        let stalled = if action.retry_count >= RETRY_CAP {
            "  [stalled]"
        } else {
            ""
        };
        println!(
            "{}  {:8}  retries={}  age={}{}",
            action.id,
            action.kind,
            action.retry_count,
            format_age(action.created_at_ms),
            stalled
        );
    }
    Ok(())
}

/// Print the number of queued actions.
pub fn count(queue_path: &Path) -> CliResult {
    let manager = open_queue(queue_path)?;
    println!("{}", manager.pending_count());
    Ok(())
}

/// Run one sync pass against the remote mutation service at `url`.
pub async fn drain(
    queue_path: &Path,
    url: &str,
    session: Option<&str>,
    retries: u32,
) -> CliResult {
    let manager = Arc::new(open_queue(queue_path)?);

    let config = RemoteConfig {
        url: url.to_string(),
        max_retries: retries,
        ..RemoteConfig::default()
    };
    let remote = WebSocketRemote::new(config);
    if let Some(principal) = session {
        remote.set_session(Principal::new(principal));
    }
    remote.connect_with_retry().await?;

    let engine = SyncEngine::new(Arc::clone(&manager), StaticProbe::online(), remote);
    match engine.run_sync().await {
        SyncPass::Empty => println!("queue is empty"),
        SyncPass::Completed { applied, halted } => {
            let remaining = manager.pending_count();
            if halted {
                println!(
                    "applied {} action(s), halted on a failing action; {} remaining",
                    applied, remaining
                );
            } else {
                println!("applied {} action(s); {} remaining", applied, remaining);
            }
        }
        // One-shot invocation with a fresh engine and an always-online
        // probe; the other outcomes cannot occur here.
        SyncPass::AlreadyRunning | SyncPass::NotLoaded | SyncPass::Offline => {}
    }
    Ok(())
}

fn open_queue(queue_path: &Path) -> Result<OfflineQueueManager<FileQueueStore>, Box<dyn Error>> {
    let store = FileQueueStore::open(queue_path)?;
    Ok(OfflineQueueManager::open(store)?)
}

/// Render how long ago an epoch-ms timestamp was, coarsely.
fn format_age(created_at_ms: i64) -> String {
    let age_ms = (Utc::now().timestamp_millis() - created_at_ms).max(0);
    let secs = age_ms / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
