// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe mapping from domain name to its two-valued state projection.

use gs_core::Projection;
use parking_lot::RwLock;
use std::collections::HashMap;

/// `domain.name → {active, inactive}`.
///
/// Invariants:
/// - every key corresponds to a domain known at the last `reload`,
/// - readers see a consistent snapshot across a single enumeration,
/// - `update`/`reload` are serialized against each other by the lock.
#[derive(Default)]
pub struct DomainStateStore {
    inner: RwLock<HashMap<String, Projection>>,
}

impl DomainStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a single domain, or `None` if it is not known.
    pub fn get(&self, domain: &str) -> Option<Projection> {
        self.inner.read().get(domain).copied()
    }

    /// Set a single domain's state, inserting it if new.
    pub fn update(&self, domain: &str, active: bool) {
        self.inner.write().insert(domain.to_string(), Projection::from_active_bool(active));
    }

    /// Atomically replace every entry with the enumerator's output.
    ///
    /// Takes the write lock across the full rebuild so no action is
    /// dispatched against a half-built map (I3).
    pub fn reload<I>(&self, enumerator: I)
    where
        I: IntoIterator<Item = (String, bool)>,
    {
        let mut guard = self.inner.write();
        guard.clear();
        for (domain, active) in enumerator {
            guard.insert(domain, Projection::from_active_bool(active));
        }
    }

    /// An immutable point-in-time view of the whole table.
    pub fn snapshot(&self) -> HashMap<String, Projection> {
        self.inner.read().clone()
    }

    /// Number of domains currently tracked.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
#[path = "domain_state_tests.rs"]
mod tests;
