// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-boundary overlay of confirmed and locally-pending records.
//!
//! Screens that list a remote collection also need to show records that
//! only exist in the offline queue. Instead of scattering `is_pending`
//! flags through view state, the two origins are resolved once, here, into
//! a tagged union the UI renders directly.

use turf_core::{ActionKind, PendingAction};

use crate::manager::QueueSnapshot;

/// A record as seen at the read boundary: either confirmed by the backend
/// or still local to the offline queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueRecord<T> {
    /// A record the backend has confirmed.
    Confirmed(T),
    /// A record that exists only as a queued action. Carries the action so
    /// the UI can key its placeholder by the action id.
    Local(PendingAction),
}

impl<T> QueueRecord<T> {
    /// Whether this record is still waiting to sync.
    pub fn is_pending(&self) -> bool {
        matches!(self, QueueRecord::Local(_))
    }

    /// The confirmed record, if any.
    pub fn confirmed(&self) -> Option<&T> {
        match self {
            QueueRecord::Confirmed(record) => Some(record),
            QueueRecord::Local(_) => None,
        }
    }

    /// The pending action, if any.
    pub fn local(&self) -> Option<&PendingAction> {
        match self {
            QueueRecord::Confirmed(_) => None,
            QueueRecord::Local(action) => Some(action),
        }
    }
}

/// Overlays queued actions of the given kind onto a confirmed listing.
///
/// Confirmed records keep their order; pending records follow in creation
/// order, matching the order they will reach the backend in.
pub fn overlay_pending<T>(
    confirmed: Vec<T>,
    snapshot: &QueueSnapshot,
    kind: ActionKind,
) -> Vec<QueueRecord<T>> {
    let mut records: Vec<QueueRecord<T>> =
        confirmed.into_iter().map(QueueRecord::Confirmed).collect();

    let mut pending: Vec<&PendingAction> = snapshot
        .actions
        .iter()
        .filter(|action| action.kind == kind)
        .collect();
    pending.sort_by_key(|action| action.sort_key());

    records.extend(pending.into_iter().cloned().map(QueueRecord::Local));
    records
}
