// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending actions: deferred remote mutations.
//!
//! Every write that cannot be confirmed against the backend immediately is
//! captured as a [`PendingAction`] and parked in the offline queue. Actions
//! carry an opaque payload; the queue and sync machinery never look inside
//! it beyond handing it to the remote client.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for a pending action.
///
/// Generated at enqueue time and visible to the backend, so it doubles as an
/// idempotency token for retried mutations.
pub type ActionId = Uuid;

/// The closed set of mutation types the queue can defer.
///
/// Serialized as the wire tags `"ADD_AREA"` / `"ADD_LEAD"`; both the sync
/// engine and the remote mutation service know this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Insert a record into the remote "areas" collection.
    AddArea,
    /// Insert a record into the remote "leads" collection.
    ///
    /// Requires an authenticated principal on the remote side.
    AddLead,
}

impl ActionKind {
    /// Returns the wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::AddArea => "ADD_AREA",
            ActionKind::AddLead => "ADD_LEAD",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deferred mutation awaiting confirmation from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Unique id, generated at enqueue time.
    pub id: ActionId,
    /// Which mutation this defers.
    pub kind: ActionKind,
    /// Opaque record with the fields needed for the remote write.
    pub payload: Value,
    /// Creation time in epoch milliseconds. Orders the queue FIFO.
    pub created_at_ms: i64,
    /// How many times a remote apply of this action has failed.
    pub retry_count: u32,
}

impl PendingAction {
    /// Creates a fresh action with a new id, `created_at_ms = now` and a
    /// zero retry count.
    pub fn new(kind: ActionKind, payload: Value) -> Self {
        PendingAction {
            id: Uuid::new_v4(),
            kind,
            payload,
            created_at_ms: Utc::now().timestamp_millis(),
            retry_count: 0,
        }
    }

    /// The key actions are synchronized by: creation time ascending, with
    /// the id as a deterministic tie-break.
    pub fn sort_key(&self) -> (i64, ActionId) {
        (self.created_at_ms, self.id)
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
