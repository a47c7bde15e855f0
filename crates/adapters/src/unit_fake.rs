// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`UnitActuator`] for engine- and daemon-level tests.

use async_trait::async_trait;
use gs_core::ActiveState;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::unit::{UnitActuator, UnitActuatorError};

/// One observed call, recorded in the order the actuator received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitCall {
    Start(String),
    Stop(String),
    Restart(String),
}

#[derive(Default)]
struct Inner {
    states: HashMap<String, ActiveState>,
    calls: Vec<UnitCall>,
}

/// Tracks a fixed set of unit names against an in-memory `ActiveState`,
/// applying the same idempotence rules the real actuator gets from systemd.
pub struct FakeUnitActuator {
    inner: Mutex<Inner>,
}

impl FakeUnitActuator {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Seed `unit_name` with a starting state, as if it were already loaded.
    pub fn seed(&self, unit_name: impl Into<String>, state: ActiveState) {
        self.inner.lock().states.insert(unit_name.into(), state);
    }

    pub fn calls(&self) -> Vec<UnitCall> {
        self.inner.lock().calls.clone()
    }

    pub fn state_of(&self, unit_name: &str) -> Option<ActiveState> {
        self.inner.lock().states.get(unit_name).copied()
    }
}

impl Default for FakeUnitActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitActuator for FakeUnitActuator {
    async fn start(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        let mut inner = self.inner.lock();
        if inner.states.get(unit_name).copied() == Some(ActiveState::Active) {
            return Ok(());
        }
        inner.calls.push(UnitCall::Start(unit_name.to_string()));
        inner.states.insert(unit_name.to_string(), ActiveState::Active);
        Ok(())
    }

    async fn stop(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        let mut inner = self.inner.lock();
        match inner.states.get(unit_name).copied() {
            None | Some(ActiveState::Inactive) => return Ok(()),
            _ => {}
        }
        inner.calls.push(UnitCall::Stop(unit_name.to_string()));
        inner.states.insert(unit_name.to_string(), ActiveState::Inactive);
        Ok(())
    }

    async fn restart(&self, unit_name: &str) -> Result<(), UnitActuatorError> {
        let mut inner = self.inner.lock();
        inner.calls.push(UnitCall::Restart(unit_name.to_string()));
        inner.states.insert(unit_name.to_string(), ActiveState::Active);
        Ok(())
    }

    async fn active_state(&self, unit_name: &str) -> Result<ActiveState, UnitActuatorError> {
        self.inner
            .lock()
            .states
            .get(unit_name)
            .copied()
            .ok_or_else(|| UnitActuatorError::NotFound(unit_name.to_string()))
    }

    async fn enumerate(&self, prefix: &str) -> Result<Vec<(String, ActiveState)>, UnitActuatorError> {
        let template = format!("{prefix}@");
        Ok(self
            .inner
            .lock()
            .states
            .iter()
            .filter(|(name, _)| name.starts_with(&template))
            .map(|(name, state)| (name.clone(), *state))
            .collect())
    }
}

#[cfg(test)]
#[path = "unit_fake_tests.rs"]
mod tests;
