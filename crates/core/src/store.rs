// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the offline queue.
//!
//! The queue is persisted as a whole on every mutation: stores expose
//! full-list `load`/`save` and nothing finer-grained. [`FileQueueStore`]
//! keeps the list in a JSONL file, one action per line, and saves through a
//! temp file plus rename so a crash mid-save leaves the previous persisted
//! list intact.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::action::PendingAction;
use crate::error::{Error, Result};

/// Full-list persistence contract for the offline queue.
///
/// A completed `save` must replace the stored list atomically; partial
/// updates are not part of the contract.
pub trait QueueStore: Send + Sync {
    /// Loads the persisted queue. An absent store reads as empty.
    fn load(&self) -> Result<Vec<PendingAction>>;

    /// Replaces the persisted queue with `actions`.
    fn save(&self, actions: &[PendingAction]) -> Result<()>;
}

impl<S: QueueStore + ?Sized> QueueStore for Arc<S> {
    fn load(&self) -> Result<Vec<PendingAction>> {
        (**self).load()
    }

    fn save(&self, actions: &[PendingAction]) -> Result<()> {
        (**self).save(actions)
    }
}

/// JSONL-file queue store.
pub struct FileQueueStore {
    /// Path to the queue file.
    path: PathBuf,
}

impl FileQueueStore {
    /// Creates a store at the given path, creating parent directories.
    ///
    /// The file itself is created lazily on the first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(FileQueueStore { path })
    }

    /// Returns the path to the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl QueueStore for FileQueueStore {
    fn load(&self) -> Result<Vec<PendingAction>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut actions = Vec::new();
        let mut seen = HashSet::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let action: PendingAction = serde_json::from_str(&line)?;
            if !seen.insert(action.id) {
                return Err(Error::CorruptedData(format!(
                    "duplicate action id {} in {}",
                    action.id,
                    self.path.display()
                )));
            }
            actions.push(action);
        }

        Ok(actions)
    }

    fn save(&self, actions: &[PendingAction]) -> Result<()> {
        // Write the full list to a sibling temp file, fsync, then rename
        // over the real file. A crash at any point keeps the previous list.
        let tmp = self.tmp_path();

        let mut file = File::create(&tmp)?;
        for action in actions {
            let json = serde_json::to_string(action)?;
            writeln!(file, "{}", json)?;
        }
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory queue store for tests and embedders that don't need
/// durability.
#[derive(Default)]
pub struct MemoryQueueStore {
    actions: Mutex<Vec<PendingAction>>,
}

impl MemoryQueueStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with the given actions.
    pub fn with_actions(actions: Vec<PendingAction>) -> Self {
        MemoryQueueStore {
            actions: Mutex::new(actions),
        }
    }
}

impl QueueStore for MemoryQueueStore {
    fn load(&self) -> Result<Vec<PendingAction>> {
        let actions = self
            .actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(actions.clone())
    }

    fn save(&self, actions: &[PendingAction]) -> Result<()> {
        let mut stored = self
            .actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *stored = actions.to_vec();
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
