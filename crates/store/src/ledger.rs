// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-domain bounded history of recent action timestamps.
//!
//! Used by the event bridge to recognize a domain's own echo and by the
//! domain actuator's worker loop to coalesce rapid-fire duplicates. The
//! ledger is an advisory timing hint, not a happens-before fence (§5).

use gs_core::{Clock, SystemClock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Default)]
struct Inner {
    log: HashMap<String, Vec<Instant>>,
    last_update: Option<Instant>,
}

/// `domain.name → ordered sequence of monotonic timestamps` of recent
/// actions.
///
/// Invariants:
/// - (L1) timestamps are monotonically non-decreasing per key,
/// - (L2) the whole ledger is purged in one pass whenever no key has seen
///   activity for `window`.
pub struct ActionLedger<C: Clock = SystemClock> {
    clock: C,
    window: Duration,
    inner: Mutex<Inner>,
}

impl ActionLedger<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ActionLedger<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ActionLedger<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_clock_and_window(clock, DEFAULT_WINDOW)
    }

    pub fn with_clock_and_window(clock: C, window: Duration) -> Self {
        Self { clock, window, inner: Mutex::new(Inner::default()) }
    }

    /// Append `now` to `key`'s sequence, then purge if the whole ledger has
    /// been idle past the window.
    pub fn record(&self, key: &str) {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        Self::purge_if_idle(&mut inner, now, self.window);
        inner.log.entry(key.to_string()).or_default().push(now);
        inner.last_update = Some(now);
    }

    /// The second-to-last timestamp recorded for `key`, or `None` if there
    /// is no such entry (the spec's "0" sentinel).
    pub fn previous(&self, key: &str) -> Option<Instant> {
        let inner = self.inner.lock();
        let entries = inner.log.get(key)?;
        entries.len().checked_sub(2).map(|idx| entries[idx])
    }

    /// The newest timestamp recorded for `key`, or `None`.
    pub fn last(&self, key: &str) -> Option<Instant> {
        let inner = self.inner.lock();
        inner.log.get(key)?.last().copied()
    }

    /// True if `key` had an action recorded strictly before the most recent
    /// one, within `threshold` of it — the coalesce/echo-suppression check
    /// used by the worker loop and the event bridge.
    pub fn acted_recently(&self, key: &str, threshold: Duration) -> bool {
        match self.previous(key) {
            Some(prev) => self.clock.now().saturating_duration_since(prev) <= threshold,
            None => false,
        }
    }

    fn purge_if_idle(inner: &mut Inner, now: Instant, window: Duration) {
        let idle = match inner.last_update {
            Some(last) => now.saturating_duration_since(last) > window,
            None => false,
        };
        if idle {
            inner.log.clear();
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
