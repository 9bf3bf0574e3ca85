// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote mutation client: applying queued actions to the backend.
//!
//! [`RemoteMutationClient`] is the contract the sync engine drains against.
//! An apply either succeeds, reports a structured conflict, or fails; the
//! engine treats a unique-violation conflict as success (the mutation's
//! effect already exists server-side), which is what makes at-least-once
//! enqueue safe to retry.
//!
//! [`WebSocketRemote`] is the production implementation: it speaks the
//! turf wire protocol over an injectable [`Transport`] and performs the
//! per-kind dispatch, keeping the engine payload-opaque:
//! - `ADD_AREA` payloads pass through untouched
//! - `ADD_LEAD` requires an authenticated [`Principal`], whose id is merged
//!   into the payload as the assignee and creator before sending

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use turf_core::{ActionKind, ClientMessage, PendingAction, ServerMessage, UNIQUE_VIOLATION};

use crate::transport::{Transport, TransportError, WebSocketTransport};

/// Error type for remote mutation attempts.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The backend reported a structured conflict.
    #[error("conflict from backend (code {code})")]
    Conflict {
        /// Backend conflict code.
        code: String,
    },

    /// The action requires an authenticated principal and none is set.
    #[error("no authenticated session")]
    NoSession,

    /// The backend refused the mutation.
    #[error("backend rejected mutation: {0}")]
    Rejected(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Max connection retries exceeded.
    #[error("max connection retries exceeded")]
    MaxRetriesExceeded,
}

impl RemoteError {
    /// Whether this error means the mutation's effect already exists
    /// server-side and the action can be treated as applied.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RemoteError::Conflict { code } if code == UNIQUE_VIOLATION)
    }
}

/// Result type for remote mutation attempts.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Contract between the sync engine and the backend.
pub trait RemoteMutationClient: Send + Sync {
    /// Attempts to apply the action remotely.
    fn apply<'a>(
        &'a self,
        action: &'a PendingAction,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>>;
}

/// The authenticated principal leads are attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Backend id of the principal.
    pub id: String,
}

impl Principal {
    /// Creates a principal with the given backend id.
    pub fn new(id: impl Into<String>) -> Self {
        Principal { id: id.into() }
    }
}

/// Configuration for the WebSocket remote client.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// URL of the remote mutation service.
    pub url: String,
    /// Maximum connection attempts for [`WebSocketRemote::connect_with_retry`].
    pub max_retries: u32,
    /// Maximum delay between connection attempts (seconds).
    pub max_delay_secs: u64,
    /// Initial delay for exponential backoff (milliseconds).
    pub initial_delay_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: "ws://localhost:7171".to_string(),
            max_retries: 10,
            max_delay_secs: 30,
            initial_delay_ms: 100,
        }
    }
}

/// Remote mutation client over the turf wire protocol.
pub struct WebSocketRemote<T: Transport = WebSocketTransport> {
    config: RemoteConfig,
    transport: tokio::sync::Mutex<T>,
    session: Mutex<Option<Principal>>,
}

impl WebSocketRemote<WebSocketTransport> {
    /// Creates a remote client with the default WebSocket transport.
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> WebSocketRemote<T> {
    /// Creates a remote client with a custom transport (for testing).
    pub fn with_transport(config: RemoteConfig, transport: T) -> Self {
        WebSocketRemote {
            config,
            transport: tokio::sync::Mutex::new(transport),
            session: Mutex::new(None),
        }
    }

    /// Sets the authenticated principal used for lead mutations.
    pub fn set_session(&self, principal: Principal) {
        *self.session_lock() = Some(principal);
    }

    /// Clears the authenticated principal.
    pub fn clear_session(&self) {
        *self.session_lock() = None;
    }

    /// Connects to the remote mutation service.
    pub async fn connect(&self) -> RemoteResult<()> {
        let mut transport = self.transport.lock().await;
        transport.connect(&self.config.url).await?;
        Ok(())
    }

    /// Connects with exponential backoff retry.
    pub async fn connect_with_retry(&self) -> RemoteResult<()> {
        let mut attempt = 0;
        let mut delay_ms = self.config.initial_delay_ms;

        loop {
            attempt += 1;

            let mut transport = self.transport.lock().await;
            match transport.connect(&self.config.url).await {
                Ok(()) => return Ok(()),
                Err(_) if attempt >= self.config.max_retries => {
                    return Err(RemoteError::MaxRetriesExceeded);
                }
                Err(e) => {
                    drop(transport);
                    tracing::debug!("connect attempt {} failed: {}", attempt, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms * 2, self.config.max_delay_secs * 1000);
                }
            }
        }
    }

    /// Disconnects from the remote mutation service.
    pub async fn disconnect(&self) -> RemoteResult<()> {
        let mut transport = self.transport.lock().await;
        transport.disconnect().await?;
        Ok(())
    }

    /// Whether the underlying transport is connected.
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_connected()
    }

    fn session_lock(&self) -> std::sync::MutexGuard<'_, Option<Principal>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds the backend-specific write for the action's kind.
    fn prepare(&self, action: &PendingAction) -> RemoteResult<PendingAction> {
        match action.kind {
            ActionKind::AddArea => Ok(action.clone()),
            ActionKind::AddLead => {
                let principal = self.session_lock().clone().ok_or(RemoteError::NoSession)?;

                let mut prepared = action.clone();
                if let Some(fields) = prepared.payload.as_object_mut() {
                    fields.insert("assigned_to".to_string(), principal.id.clone().into());
                    fields.insert("created_by".to_string(), principal.id.into());
                }
                Ok(prepared)
            }
        }
    }

    async fn apply_inner(&self, action: &PendingAction) -> RemoteResult<()> {
        let prepared = self.prepare(action)?;

        let mut transport = self.transport.lock().await;
        transport.send(ClientMessage::apply(prepared)).await?;

        // The server answers per action id; skip anything else (pongs,
        // responses to actions applied on other connections).
        loop {
            match transport.recv().await? {
                Some(ServerMessage::Applied { id }) if id == action.id => return Ok(()),
                Some(ServerMessage::Conflict { id, code }) if id == action.id => {
                    return Err(RemoteError::Conflict { code });
                }
                Some(ServerMessage::Rejected { id, message }) if id == action.id => {
                    return Err(RemoteError::Rejected(message));
                }
                Some(_) => continue,
                None => return Err(TransportError::ConnectionClosed.into()),
            }
        }
    }
}

impl<T: Transport> RemoteMutationClient for WebSocketRemote<T> {
    fn apply<'a>(
        &'a self,
        action: &'a PendingAction,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>> {
        Box::pin(self.apply_inner(action))
    }
}
