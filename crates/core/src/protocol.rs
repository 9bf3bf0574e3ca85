// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for the remote mutation service.
//!
//! The protocol is a simple request/response exchange over a persistent
//! connection:
//! - Client submits pending actions with Apply
//! - Server answers each action by id: applied, conflict, or rejected
//!
//! A conflict carrying [`UNIQUE_VIOLATION`] means the mutation's effect
//! already exists server-side and must be treated as success by callers.

use serde::{Deserialize, Serialize};

use crate::action::{ActionId, PendingAction};

/// Conflict code for a relational unique-constraint violation.
///
/// The backend enforces natural-key uniqueness on the collections the queue
/// writes to; a repeat insert surfaces as a conflict with this code.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit a pending action for remote application.
    ///
    /// The server answers with Applied, Conflict, or Rejected for the
    /// action's id.
    Apply(PendingAction),

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The action was applied remotely.
    Applied {
        /// Id of the applied action.
        id: ActionId,
    },

    /// The action collided with existing server-side state.
    ///
    /// `code` is the backend's structured conflict code; see
    /// [`UNIQUE_VIOLATION`].
    Conflict {
        /// Id of the conflicting action.
        id: ActionId,
        /// Backend conflict code.
        code: String,
    },

    /// The server refused to apply the action.
    Rejected {
        /// Id of the rejected action.
        id: ActionId,
        /// Human-readable error description.
        message: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },
}

impl ClientMessage {
    /// Creates an Apply message.
    pub fn apply(action: PendingAction) -> Self {
        ClientMessage::Apply(action)
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Applied message.
    pub fn applied(id: ActionId) -> Self {
        ServerMessage::Applied { id }
    }

    /// Creates a Conflict message.
    pub fn conflict(id: ActionId, code: impl Into<String>) -> Self {
        ServerMessage::Conflict {
            id,
            code: code.into(),
        }
    }

    /// Creates a Rejected message.
    pub fn rejected(id: ActionId, message: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            id,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
