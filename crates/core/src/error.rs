// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for turf-core operations.

use thiserror::Error;

/// All possible errors that can occur in turf-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted queue data: {0}")]
    CorruptedData(String),

    #[error("queue has not been loaded from its store yet")]
    QueueNotLoaded,
}

/// A specialized Result type for turf-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
