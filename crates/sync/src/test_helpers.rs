// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the sync crate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::Notify;

use turf_core::{
    ActionId, ActionKind, ClientMessage, Error, PendingAction, QueueStore, Result, ServerMessage,
    UNIQUE_VIOLATION,
};

use crate::remote::{RemoteError, RemoteMutationClient, RemoteResult};
use crate::transport::{Transport, TransportError, TransportResult};

/// Create an area action with the given creation timestamp.
pub fn make_area(created_at_ms: i64) -> PendingAction {
    let mut action = PendingAction::new(
        ActionKind::AddArea,
        json!({"name": format!("area-{}", created_at_ms)}),
    );
    action.created_at_ms = created_at_ms;
    action
}

/// Create a lead action with the given creation timestamp.
pub fn make_lead(created_at_ms: i64) -> PendingAction {
    let mut action = PendingAction::new(
        ActionKind::AddLead,
        json!({"name": "Dana", "phone": format!("555-{:04}", created_at_ms % 10_000)}),
    );
    action.created_at_ms = created_at_ms;
    action
}

/// Scripted outcome of a remote apply.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// The backend applies the mutation.
    Applied,
    /// The backend reports a unique-violation conflict.
    Duplicate,
    /// The backend fails transiently.
    Fail,
}

/// Remote fake with per-action scripted outcomes.
///
/// Unscripted actions succeed. Every apply attempt is recorded in order.
#[derive(Clone, Default)]
pub struct ScriptedRemote {
    outcomes: Arc<Mutex<HashMap<ActionId, Outcome>>>,
    attempts: Arc<Mutex<Vec<ActionId>>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for a specific action.
    pub fn set_outcome(&self, id: ActionId, outcome: Outcome) {
        self.outcomes.lock().unwrap().insert(id, outcome);
    }

    /// All apply attempts, in order.
    pub fn attempts(&self) -> Vec<ActionId> {
        self.attempts.lock().unwrap().clone()
    }
}

impl RemoteMutationClient for ScriptedRemote {
    fn apply<'a>(
        &'a self,
        action: &'a PendingAction,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.attempts.lock().unwrap().push(action.id);
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .get(&action.id)
                .copied()
                .unwrap_or(Outcome::Applied);
            match outcome {
                Outcome::Applied => Ok(()),
                Outcome::Duplicate => Err(RemoteError::Conflict {
                    code: UNIQUE_VIOLATION.to_string(),
                }),
                Outcome::Fail => Err(RemoteError::Rejected("scripted failure".to_string())),
            }
        })
    }
}

/// Remote fake whose applies block until released.
///
/// Used to hold a pass open while asserting single-flight behavior.
#[derive(Clone, Default)]
pub struct BlockingRemote {
    started: Arc<Notify>,
    release: Arc<Notify>,
    attempts: Arc<Mutex<Vec<ActionId>>>,
}

impl BlockingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until an apply is in flight.
    pub async fn wait_until_started(&self) {
        self.started.notified().await;
    }

    /// Releases one blocked apply.
    pub fn release_one(&self) {
        self.release.notify_one();
    }

    /// All apply attempts, in order.
    pub fn attempts(&self) -> Vec<ActionId> {
        self.attempts.lock().unwrap().clone()
    }
}

impl RemoteMutationClient for BlockingRemote {
    fn apply<'a>(
        &'a self,
        action: &'a PendingAction,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.attempts.lock().unwrap().push(action.id);
            self.started.notify_one();
            self.release.notified().await;
            Ok(())
        })
    }
}

/// Queue store whose saves always fail. Loads succeed and return the
/// seeded list.
#[derive(Default)]
pub struct FailingStore {
    seeded: Vec<PendingAction>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueStore for FailingStore {
    fn load(&self) -> Result<Vec<PendingAction>> {
        Ok(self.seeded.clone())
    }

    fn save(&self, _actions: &[PendingAction]) -> Result<()> {
        Err(Error::Io(std::io::Error::other("disk full")))
    }
}

/// Mock transport for testing the WebSocket remote without real sockets.
pub struct MockTransport {
    connected: bool,
    /// Messages that will be returned by recv().
    incoming: Arc<Mutex<VecDeque<ServerMessage>>>,
    /// Messages that were sent via send().
    outgoing: Arc<Mutex<Vec<ClientMessage>>>,
    /// How many connect attempts fail before one succeeds.
    failing_connects: Arc<Mutex<u32>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            connected: false,
            incoming: Arc::new(Mutex::new(VecDeque::new())),
            outgoing: Arc::new(Mutex::new(Vec::new())),
            failing_connects: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a message that will be returned by recv().
    pub fn queue_incoming(&self, msg: ServerMessage) {
        self.incoming.lock().unwrap().push_back(msg);
    }

    /// Get all messages that were sent.
    pub fn get_outgoing(&self) -> Vec<ClientMessage> {
        self.outgoing.lock().unwrap().clone()
    }

    /// Handle to the outgoing log, usable after the transport moves into a
    /// remote client.
    pub fn outgoing_handle(&self) -> Arc<Mutex<Vec<ClientMessage>>> {
        Arc::clone(&self.outgoing)
    }

    /// Fail the next `count` connect attempts.
    pub fn fail_connects(&self, count: u32) {
        *self.failing_connects.lock().unwrap() = count;
    }
}

impl Transport for MockTransport {
    fn connect(
        &mut self,
        _url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let mut failing = self.failing_connects.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            drop(failing);
            self.connected = true;
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn send(
        &mut self,
        msg: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let outgoing = Arc::clone(&self.outgoing);
        Box::pin(async move {
            outgoing.lock().unwrap().push(msg);
            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<ServerMessage>>> + Send + '_>> {
        let incoming = Arc::clone(&self.incoming);
        Box::pin(async move {
            let msg = incoming.lock().unwrap().pop_front();
            Ok(msg)
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
