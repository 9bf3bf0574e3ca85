// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity probing.
//!
//! The engine never talks to the network stack directly; it asks an
//! injected [`ConnectivityProbe`] whether the device is connected and the
//! internet is actually reachable. Captive portals make the distinction
//! matter: an interface can be up while nothing routes.

use std::future::Future;
use std::pin::Pin;

/// Current reachability as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    /// A network interface is connected.
    pub connected: bool,
    /// Traffic actually reaches the internet.
    pub internet_reachable: bool,
}

impl Reachability {
    /// Fully reachable.
    pub fn online() -> Self {
        Reachability {
            connected: true,
            internet_reachable: true,
        }
    }

    /// Fully unreachable.
    pub fn offline() -> Self {
        Reachability {
            connected: false,
            internet_reachable: false,
        }
    }

    /// Whether a sync pass should attempt remote calls.
    pub fn is_online(&self) -> bool {
        self.connected && self.internet_reachable
    }
}

/// Reachability query, injectable for testing.
pub trait ConnectivityProbe: Send + Sync {
    /// Queries the current reachability.
    fn reachability(&self) -> Pin<Box<dyn Future<Output = Reachability> + Send + '_>>;
}

/// Probe that always reports a fixed answer.
///
/// Used by tests and by CLI invocations where the operator has already
/// decided connectivity is available.
pub struct StaticProbe {
    reachability: Reachability,
}

impl StaticProbe {
    /// Probe with the given fixed answer.
    pub fn new(reachability: Reachability) -> Self {
        StaticProbe { reachability }
    }

    /// Probe that always reports online.
    pub fn online() -> Self {
        Self::new(Reachability::online())
    }

    /// Probe that always reports offline.
    pub fn offline() -> Self {
        Self::new(Reachability::offline())
    }
}

impl ConnectivityProbe for StaticProbe {
    fn reachability(&self) -> Pin<Box<dyn Future<Output = Reachability> + Send + '_>> {
        let reachability = self.reachability;
        Box::pin(async move { reachability })
    }
}
